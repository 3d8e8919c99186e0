use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub duration_hours: i64,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOn {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub is_hourly: bool,
    pub available_packages: Vec<i64>,
}

impl AddOn {
    pub fn available_for(&self, package_id: i64) -> bool {
        self.available_packages.contains(&package_id)
    }
}
