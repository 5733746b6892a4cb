//! Countries, provinces and cities.

use serde::Serialize;

use tradepost_core::{CityId, CountryId, ProvinceId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub iso_code: String,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Province {
    pub id: ProvinceId,
    pub country_id: CountryId,
    pub country_name: String,
    pub name: String,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct City {
    pub id: CityId,
    pub province_id: ProvinceId,
    pub province_name: String,
    pub name: String,
    pub state: bool,
}
