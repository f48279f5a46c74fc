use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Banner {
    pub message: &'static str,
}
