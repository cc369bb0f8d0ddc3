//! Row shapes and client-side aggregation for the report tables.

use std::{collections::BTreeSet, time::SystemTime};

use time::{Date, Month, OffsetDateTime};

use super::catalog;
use super::form::DEFAULT_AGENT;
use super::mappers::parse_date;
use super::ship::{EntityId, ShipCargoDto, ShipDto};

/// Joins the non-empty values in first-seen order, skipping repeats.
fn unique_joined<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut seen = Vec::<&str>::new();
    for value in values.filter(|v| !v.is_empty()) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.join(", ")
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Sum of the tonnages when every one is numeric, otherwise the raw values joined.
pub fn tonnage_label(cargoes: &[ShipCargoDto]) -> String {
    let numbers: Option<Vec<f64>> = cargoes.iter().map(|c| parse_number(&c.tonnage)).collect();
    match numbers {
        Some(values) => values.iter().fold(0.0, |total, n| total + n).to_string(),
        None => cargoes
            .iter()
            .map(|c| c.tonnage.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Total tonnage, counting non-numeric entries as zero.
pub fn total_tonnage(cargoes: &[ShipCargoDto]) -> f64 {
    cargoes
        .iter()
        .filter_map(|c| parse_number(&c.tonnage))
        .fold(0.0, |total, n| total + n)
}

/// Whole tonnages without decimals, others to two places.
pub fn format_tonnage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShipRow {
    pub id: Option<EntityId>,
    pub name: String,
    pub imo: String,
    pub dwt: String,
    pub boarding_port: String,
    pub berthing_date: Option<String>,
    pub completion_date: Option<String>,
    pub agent: String,
    pub cargo_type: String,
    pub cargo_category: String,
    pub receivers: String,
    pub fournisseurs: String,
    pub tonnage: String,
    pub document_count: usize,
}

impl From<&ShipDto> for ShipRow {
    fn from(dto: &ShipDto) -> Self {
        let agent = dto
            .agent
            .as_deref()
            .filter(|agent| !agent.is_empty())
            .unwrap_or(DEFAULT_AGENT);
        Self {
            id: dto.id.clone(),
            name: dto.name.clone(),
            imo: dto.imo.clone(),
            dwt: dto.dwt.clone(),
            boarding_port: dto.boarding_port.clone(),
            berthing_date: dto.berthing_date.clone(),
            completion_date: dto.completion_date.clone(),
            agent: agent.to_string(),
            cargo_type: unique_joined(dto.cargoes.iter().map(|c| c.kind.as_str())),
            cargo_category: unique_joined(dto.cargoes.iter().map(|c| c.category.as_str())),
            receivers: unique_joined(dto.cargoes.iter().map(|c| c.receiver_name.as_str())),
            fournisseurs: unique_joined(dto.cargoes.iter().map(|c| c.fournisseur_name.as_str())),
            tonnage: tonnage_label(&dto.cargoes),
            document_count: dto.ship_documents.len()
                + dto.charter_documents.len()
                + dto.receiver_documents.len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FleetRow {
    pub id: Option<EntityId>,
    pub name: String,
    pub imo: String,
    pub dwt: String,
    pub boarding_port: String,
    pub berthing_date: Option<String>,
    pub receivers: String,
    pub fournisseurs: String,
    pub ship_owner: String,
    pub ship_owner_phone: String,
    pub has_cargo: bool,
    pub tonnage: String,
}

impl From<&ShipDto> for FleetRow {
    fn from(dto: &ShipDto) -> Self {
        let receivers = dto
            .cargoes
            .iter()
            .map(|c| c.receiver_name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let owner = dto.ship_owner.as_ref();
        Self {
            id: dto.id.clone(),
            name: dto.name.clone(),
            imo: dto.imo.clone(),
            dwt: dto.dwt.clone(),
            boarding_port: dto.boarding_port.clone(),
            berthing_date: dto.berthing_date.clone(),
            receivers,
            fournisseurs: unique_joined(dto.cargoes.iter().map(|c| c.fournisseur_name.as_str())),
            ship_owner: owner.map(|o| o.name.clone()).unwrap_or_default(),
            ship_owner_phone: owner
                .and_then(|o| o.phone_number.clone())
                .unwrap_or_default(),
            has_cargo: !dto.cargoes.is_empty(),
            tonnage: tonnage_label(&dto.cargoes),
        }
    }
}

/// Keeps ships whose dwt falls in the inclusive range. Blank or unparseable bounds are open.
pub fn filter_by_dwt<'a>(ships: &'a [ShipDto], from: &str, to: &str) -> Vec<&'a ShipDto> {
    let low = parse_number(from).unwrap_or(f64::NEG_INFINITY);
    let high = parse_number(to).unwrap_or(f64::INFINITY);
    let bounded = low.is_finite() || high.is_finite();

    ships
        .iter()
        .filter(|ship| {
            if !bounded {
                return true;
            }
            let dwt = if ship.dwt.trim().is_empty() {
                Some(0.0)
            } else {
                parse_number(&ship.dwt)
            };
            dwt.is_some_and(|dwt| dwt >= low && dwt <= high)
        })
        .collect()
}

/// Choices for the report filter selects, derived from the loaded ships.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub ports: Vec<String>,
    pub categories: Vec<String>,
    pub receivers: Vec<String>,
    pub sub_categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_ships(ships: &[ShipDto]) -> Self {
        let mut ports = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut receivers = BTreeSet::new();
        let mut sub_categories = BTreeSet::new();

        for ship in ships {
            if !ship.boarding_port.is_empty() {
                ports.insert(ship.boarding_port.clone());
            }
            for cargo in &ship.cargoes {
                if !cargo.category.is_empty() {
                    categories.insert(cargo.category.clone());
                }
                if !cargo.receiver_name.is_empty() {
                    receivers.insert(cargo.receiver_name.clone());
                }
                if !cargo.sub_category.is_empty() {
                    sub_categories.insert(cargo.sub_category.clone());
                }
            }
        }

        if categories.is_empty() {
            categories.extend(catalog::cargo_categories().into_iter().map(String::from));
        }

        Self {
            ports: ports.into_iter().collect(),
            categories: categories.into_iter().collect(),
            receivers: receivers.into_iter().collect(),
            sub_categories: sub_categories.into_iter().collect(),
        }
    }
}

/// Figures shown in the agent details dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentTotals {
    pub ships: usize,
    pub total_dwt: f64,
    pub total_cargoes: usize,
}

impl AgentTotals {
    pub fn from_ships(ships: &[ShipDto]) -> Self {
        Self {
            ships: ships.len(),
            total_dwt: ships.iter().filter_map(|s| parse_number(&s.dwt)).sum(),
            total_cargoes: ships.iter().map(|s| s.cargoes.len()).sum(),
        }
    }
}

/// Inclusive calendar range used by the report date filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    fn whole_year(year: i32) -> Option<Self> {
        Some(Self {
            from: Date::from_calendar_date(year, Month::January, 1).ok()?,
            to: Date::from_calendar_date(year, Month::December, 31).ok()?,
        })
    }

    pub fn this_year(today: Date) -> Option<Self> {
        Self::whole_year(today.year())
    }

    pub fn last_year(today: Date) -> Option<Self> {
        Self::whole_year(today.year() - 1)
    }
}

/// `YYYY-MM-DD`, as the ships endpoint expects.
pub fn format_query_date(date: Date) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_default()
}

pub fn parse_query_date(value: &str) -> Option<Date> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).ok()
}

/// `DD-MM-YYYY - HH:mm` for table cells; `N/A` when the date is missing.
pub fn format_report_date(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return String::from("N/A");
    };
    let format = time::macros::format_description!("[day]-[month]-[year] - [hour]:[minute]");
    parse_date(raw)
        .and_then(|date| date.format(&format).ok())
        .unwrap_or_else(|| raw.to_string())
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Short age of a fetched list, e.g. `3m ago`.
pub fn fetch_age_label(fetched_at: SystemTime, now: SystemTime) -> String {
    let age = now.duration_since(fetched_at).unwrap_or_default().as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ship::ShipPersonnelContactDto;
    use pretty_assertions::assert_eq;
    use time::macros::date;

    fn cargo(kind: &str, category: &str, receiver: &str, fournisseur: &str, tonnage: &str) -> ShipCargoDto {
        ShipCargoDto {
            kind: kind.into(),
            category: category.into(),
            receiver_name: receiver.into(),
            fournisseur_name: fournisseur.into(),
            tonnage: tonnage.into(),
            ..ShipCargoDto::default()
        }
    }

    fn ship(dwt: &str, cargoes: Vec<ShipCargoDto>) -> ShipDto {
        ShipDto {
            name: "Atlantic Star".into(),
            imo: "9321483".into(),
            dwt: dwt.into(),
            boarding_port: "Nouakchott".into(),
            cargoes,
            ..ShipDto::default()
        }
    }

    #[test]
    fn ship_row_defaults_agent_and_joins_unique_values() {
        let dto = ship(
            "45000",
            vec![
                cargo("container", "Food", "Sahel Import", "Agro SA", "100"),
                cargo("cargaison", "Cereals", "Sahel Import", "Agro SA", "250.5"),
                cargo("container", "Food", "Port Trade", "", "50"),
            ],
        );
        let row = ShipRow::from(&dto);
        assert_eq!(row.agent, "NAVLION");
        assert_eq!(row.cargo_type, "container, cargaison");
        assert_eq!(row.cargo_category, "Food, Cereals");
        assert_eq!(row.receivers, "Sahel Import, Port Trade");
        assert_eq!(row.fournisseurs, "Agro SA");
        assert_eq!(row.tonnage, "400.5");
    }

    #[test]
    fn fleet_row_joins_receivers_and_reads_owner() {
        let mut dto = ship(
            "1200",
            vec![
                cargo("container", "Food", "Sahel Import", "Agro SA", "100"),
                cargo("container", "Food", "Sahel Import", "Agro SA", "about 20"),
            ],
        );
        dto.ship_owner = Some(ShipPersonnelContactDto {
            name: "Owner Ltd".into(),
            phone_number: Some("+222 45".into()),
            ..ShipPersonnelContactDto::default()
        });
        let row = FleetRow::from(&dto);
        assert_eq!(row.receivers, "Sahel Import, Sahel Import");
        assert_eq!(row.fournisseurs, "Agro SA");
        assert_eq!(row.ship_owner, "Owner Ltd");
        assert_eq!(row.ship_owner_phone, "+222 45");
        assert!(row.has_cargo);
        assert_eq!(row.tonnage, "100, about 20");
    }

    #[test]
    fn no_cargo_means_zero_tonnage() {
        let row = FleetRow::from(&ship("10", Vec::new()));
        assert!(!row.has_cargo);
        assert_eq!(row.tonnage, "0");
        assert_eq!(tonnage_label(&[]), "0");
        assert_eq!(format_tonnage(total_tonnage(&[])), "0");
    }

    #[test]
    fn dwt_filter_is_inclusive_with_open_bounds() {
        let ships = vec![ship("1000", vec![]), ship("5000", vec![]), ship("n/a", vec![])];

        let names = |found: Vec<&ShipDto>| found.iter().map(|s| s.dwt.clone()).collect::<Vec<_>>();
        assert_eq!(names(filter_by_dwt(&ships, "1000", "5000")), vec!["1000", "5000"]);
        assert_eq!(names(filter_by_dwt(&ships, "2000", "")), vec!["5000"]);
        assert_eq!(names(filter_by_dwt(&ships, "abc", "1500")), vec!["1000"]);
        assert_eq!(filter_by_dwt(&ships, "", "").len(), 3);
    }

    #[test]
    fn filter_options_are_sorted_and_unique() {
        let mut second = ship("1", vec![cargo("container", "Cereals", "B Corp", "", "1")]);
        second.boarding_port = "Dakar".into();
        let ships = vec![
            ship("1", vec![cargo("container", "Food", "A Corp", "", "1")]),
            second,
        ];
        let options = FilterOptions::from_ships(&ships);
        assert_eq!(options.ports, vec!["Dakar", "Nouakchott"]);
        assert_eq!(options.categories, vec!["Cereals", "Food"]);
        assert_eq!(options.receivers, vec!["A Corp", "B Corp"]);
    }

    #[test]
    fn filter_options_fall_back_to_catalog_categories() {
        let options = FilterOptions::from_ships(&[ship("1", vec![])]);
        assert_eq!(options.categories.len(), catalog::CARGO_CATEGORIES.len());
    }

    #[test]
    fn agent_totals() {
        let ships = vec![
            ship("1000", vec![cargo("container", "Food", "", "", "1")]),
            ship("2500.5", vec![]),
            ship("", vec![]),
        ];
        let totals = AgentTotals::from_ships(&ships);
        assert_eq!(totals.ships, 3);
        assert_eq!(totals.total_dwt, 3500.5);
        assert_eq!(totals.total_cargoes, 1);
        assert_eq!(total_tonnage(&ships[0].cargoes), 1.0);
    }

    #[test]
    fn date_presets_cover_whole_years() {
        let today = date!(2025 - 06 - 15);
        let last = DateRange::last_year(today).unwrap();
        assert_eq!(format_query_date(last.from), "2024-01-01");
        assert_eq!(format_query_date(last.to), "2024-12-31");
        let this = DateRange::this_year(today).unwrap();
        assert_eq!(this.from, date!(2025 - 01 - 01));
        assert_eq!(this.to, date!(2025 - 12 - 31));
        assert_eq!(parse_query_date("2025-01-01"), Some(this.from));
    }

    #[test]
    fn report_dates_are_human_formatted() {
        assert_eq!(
            format_report_date(Some("2025-03-04T08:05:00Z")),
            "04-03-2025 - 08:05"
        );
        assert_eq!(format_report_date(None), "N/A");
        assert_eq!(format_report_date(Some("soon")), "soon");
    }

    #[test]
    fn fetch_age_is_coarse() {
        use std::time::Duration;
        let now = SystemTime::now();
        assert_eq!(fetch_age_label(now, now), "0s ago");
        assert_eq!(fetch_age_label(now - Duration::from_secs(150), now), "2m ago");
        assert_eq!(fetch_age_label(now - Duration::from_secs(7_300), now), "2h ago");
        assert_eq!(fetch_age_label(now - Duration::from_secs(200_000), now), "2d ago");
        // A clock going backwards reads as fresh.
        assert_eq!(fetch_age_label(now + Duration::from_secs(30), now), "0s ago");
    }

    #[test]
    fn tonnage_display() {
        assert_eq!(format_tonnage(1200.0), "1200");
        assert_eq!(format_tonnage(12.5), "12.50");
        assert_eq!(format_tonnage(0.0), "0");
    }
}
