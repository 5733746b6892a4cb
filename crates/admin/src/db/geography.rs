//! Countries, provinces and cities.

use serde::Deserialize;

use tradepost_core::{CountryId, ProvinceId};

use super::RepositoryError;
use super::listing::{Filters, ListSpec, Listable, NoScope, ScopeFilter, empty_as_none};
use crate::models::{City, Country, Province};

pub struct Countries;

impl Listable for Countries {
    const ENTITY: &'static str = "country";
    const SLUG: &'static str = "countries";
    const TITLE: &'static str = "Countries";
    const TABLE: &'static str = "country";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT c.id, c.name, c.iso_code, c.state FROM shop.country c",
        count: "SELECT COUNT(*) FROM shop.country c",
        id_column: "c.id",
        text_columns: &["c.name", "c.iso_code"],
        active: Some("c.state"),
        order_by: "c.name",
    };

    type Row = Country;
    type Item = Country;
    type Scope = NoScope;

    fn convert(row: Country) -> Result<Country, RepositoryError> {
        Ok(row)
    }
}

/// Provinces of one country.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvinceScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country_id: Option<CountryId>,
}

impl ScopeFilter for ProvinceScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(id) = self.country_id {
            filters.and().push("p.country_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Provinces;

impl Listable for Provinces {
    const ENTITY: &'static str = "province";
    const SLUG: &'static str = "provinces";
    const TITLE: &'static str = "Provinces";
    const TABLE: &'static str = "province";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT p.id, p.country_id, c.name AS country_name, p.name, p.state \
                 FROM shop.province p JOIN shop.country c ON c.id = p.country_id",
        count: "SELECT COUNT(*) FROM shop.province p JOIN shop.country c ON c.id = p.country_id",
        id_column: "p.id",
        text_columns: &["p.name"],
        active: Some("p.state"),
        order_by: "c.name, p.name",
    };

    type Row = Province;
    type Item = Province;
    type Scope = ProvinceScope;

    fn convert(row: Province) -> Result<Province, RepositoryError> {
        Ok(row)
    }
}

/// Cities of one province.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub province_id: Option<ProvinceId>,
}

impl ScopeFilter for CityScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(id) = self.province_id {
            filters.and().push("ci.province_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Cities;

impl Listable for Cities {
    const ENTITY: &'static str = "city";
    const SLUG: &'static str = "cities";
    const TITLE: &'static str = "Cities";
    const TABLE: &'static str = "city";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT ci.id, ci.province_id, p.name AS province_name, ci.name, ci.state \
                 FROM shop.city ci JOIN shop.province p ON p.id = ci.province_id",
        count: "SELECT COUNT(*) FROM shop.city ci JOIN shop.province p ON p.id = ci.province_id",
        id_column: "ci.id",
        text_columns: &["ci.name"],
        active: Some("ci.state"),
        order_by: "ci.name",
    };

    type Row = City;
    type Item = City;
    type Scope = CityScope;

    fn convert(row: City) -> Result<City, RepositoryError> {
        Ok(row)
    }
}
