use serde::Serialize;

/// Row counts the site needs before it can render its pages.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SiteInventory {
    pub aircraft_categories: i64,
    pub aircraft: i64,
    pub airports: i64,
}

impl SiteInventory {
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.aircraft_categories == 0 {
            problems.push("No aircraft categories found".to_string());
        }
        if self.aircraft == 0 {
            problems.push("No aircraft found".to_string());
        }
        if self.airports == 0 {
            problems.push("No airports found".to_string());
        }
        problems
    }

    pub fn is_ready(&self) -> bool {
        self.problems().is_empty()
    }
}
