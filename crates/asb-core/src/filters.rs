//! Declarative search-filter definitions.
//!
//! The menu tree is composed from this table at startup; the session store
//! validates stored values against it.

/// A named, closed-option search preference (e.g. max price).
#[derive(Clone, Debug)]
pub struct FilterDef {
    /// Stable key, also the menu node key for this filter's submenu.
    pub name: String,
    /// Display title used on buttons and in the filter summary.
    pub title: String,
    /// Body text of the filter's submenu.
    pub prompt: String,
    /// Ordered option values; the first one is the default.
    pub values: Vec<String>,
    /// Place this filter's button on the same keyboard row as the previous one.
    pub join_last_row: bool,
}

impl FilterDef {
    pub fn default_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

/// The stock filter table for the auction server search.
pub fn default_filters() -> Vec<FilterDef> {
    vec![
        FilterDef {
            name: "maxprice".to_string(),
            title: "Max. Price".to_string(),
            prompt: "Set the max. price (excl. VAT):".to_string(),
            values: values(&[
                "Any", "30", "40", "50", "60", "70", "80", "90", "100", "110", "120", "130",
                "140", "150", "200",
            ]),
            join_last_row: false,
        },
        FilterDef {
            name: "minhd".to_string(),
            title: "Min. HD".to_string(),
            prompt: "Set the min. number of disks:".to_string(),
            values: std::iter::once("Any".to_string())
                .chain((1..=15).map(|n| n.to_string()))
                .collect(),
            join_last_row: true,
        },
        FilterDef {
            name: "minram".to_string(),
            title: "Min. RAM".to_string(),
            prompt: "Set the min. RAM size in GB:".to_string(),
            values: values(&[
                "Any", "2", "4", "8", "12", "16", "24", "32", "48", "64", "96", "128", "256",
                "512", "768",
            ]),
            join_last_row: true,
        },
        FilterDef {
            name: "cputype".to_string(),
            title: "CPU Type".to_string(),
            prompt: "Set the preferred CPU type:".to_string(),
            values: values(&["Any", "Intel", "AMD"]),
            join_last_row: false,
        },
    ]
}

fn values(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}
