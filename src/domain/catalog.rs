//! Reference lists offered by the form selects.

pub const ANY_SHIP_TYPE: &str = "Any type";

pub struct ShipTypeGroup {
    pub label: &'static str,
    pub subtypes: &'static [&'static str],
}

pub const SHIP_TYPE_GROUPS: &[ShipTypeGroup] = &[
    ShipTypeGroup {
        label: "Cargo",
        subtypes: &[
            "All Cargo Vessels",
            "Bulk carrier",
            "General Cargo",
            "Container Ship",
            "Reefer",
            "Ro-Ro",
            "Vehicles Carrier",
            "Cement Carrier",
            "Wood Chips Carrier",
            "Urea Carrier",
            "Aggregates Carrier",
            "Limestone Carrier",
            "Landing Craft",
            "Livestock Carrier",
            "Heavy Load Carrier",
        ],
    },
    ShipTypeGroup {
        label: "Tankers",
        subtypes: &[
            "All Tankers",
            "Crude Oil Tanker",
            "Oil Products Tanker",
            "Chemical / Oil Tanker",
            "LNG Tanker",
            "LPG Tanker",
            "Asphalt / Bitumen",
            "Bunkering Tanker",
            "FSO / FPSO",
            "Other Tanker",
        ],
    },
    ShipTypeGroup {
        label: "Passenger/Cruise",
        subtypes: &[
            "All Passenger/Cruise Ships",
            "Cruise Ship",
            "Passenger / Cargo Ship",
            "Passenger / Ro-Ro Ship",
            "Passenger Ship",
        ],
    },
    ShipTypeGroup {
        label: "Other",
        subtypes: &[
            "Fishing ships",
            "Yachts / Sailing Vessels",
            "Military",
            "Tugs",
            "Other type / Auxiliary",
            "Unknown",
        ],
    },
];

/// Flat ship type list for dropdowns, `Any type` first.
pub fn ship_type_options() -> Vec<&'static str> {
    std::iter::once(ANY_SHIP_TYPE)
        .chain(SHIP_TYPE_GROUPS.iter().flat_map(|group| group.subtypes.iter().copied()))
        .collect()
}

/// Cargo categories with their sub-categories. An empty list means the category is its own sub-category.
pub const CARGO_CATEGORIES: &[(&str, &[&str])] = &[
    ("Cereals", &["Wheat", "Corn", "Barley", "Rice"]),
    ("Food", &["Sugar", "Flour", "Vegetable oil", "Milk powder", "Tea"]),
    ("Construction", &["Cement", "Clinker", "Iron bars", "Aggregates"]),
    ("Hydrocarbons", &["Gasoil", "Gasoline", "Jet fuel", "Fuel oil", "LPG"]),
    ("Fertilizers", &["Urea", "DAP", "NPK"]),
    ("Vehicles", &["Cars", "Trucks", "Machinery"]),
    ("Fish products", &["Frozen fish", "Fish meal", "Fish oil"]),
    ("Minerals", &["Iron ore", "Gypsum", "Copper"]),
    ("General cargo", &[]),
];

pub fn cargo_categories() -> Vec<&'static str> {
    CARGO_CATEGORIES.iter().map(|(category, _)| *category).collect()
}

pub fn sub_categories_for(category: &str) -> Vec<String> {
    match CARGO_CATEGORIES.iter().find(|(name, _)| *name == category) {
        Some((_, subs)) if !subs.is_empty() => subs.iter().map(|s| s.to_string()).collect(),
        _ if category.is_empty() => Vec::new(),
        _ => vec![category.to_string()],
    }
}

pub const BOARDING_PORTS: &[&str] = &[
    "Nouakchott",
    "Nouadhibou",
    "Dakar",
    "Abidjan",
    "Casablanca",
    "Las Palmas",
    "Banjul",
    "Conakry",
];

pub const SHIP_STATUSES: &[&str] = &["Expected", "At anchorage", "Berthed", "Working", "Completed", "Sailed"];

pub const COUNTRIES: &[&str] = &[
    "Argentina",
    "Brazil",
    "China",
    "Egypt",
    "France",
    "Germany",
    "India",
    "Italy",
    "Mauritania",
    "Morocco",
    "Netherlands",
    "Russia",
    "Senegal",
    "Spain",
    "Turkey",
    "Ukraine",
    "United Arab Emirates",
    "United States",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_options_start_with_any_type() {
        let options = ship_type_options();
        assert_eq!(options[0], ANY_SHIP_TYPE);
        let subtypes: usize = SHIP_TYPE_GROUPS.iter().map(|g| g.subtypes.len()).sum();
        assert_eq!(options.len(), subtypes + 1);
        assert!(options.contains(&"LNG Tanker"));
    }

    #[test]
    fn sub_categories_fall_back_to_category() {
        assert_eq!(sub_categories_for("Fertilizers"), vec!["Urea", "DAP", "NPK"]);
        assert_eq!(sub_categories_for("General cargo"), vec!["General cargo"]);
        assert_eq!(sub_categories_for("Timber"), vec!["Timber"]);
        assert!(sub_categories_for("").is_empty());
    }
}
