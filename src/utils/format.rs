use crate::models::Merchant;

/// Nearby merchants listed by name before the rest are summarised
const NEARBY_LISTED: usize = 5;

/// Format a cashback rate as typed by the user (e.g. 1.5%, 3%)
pub fn format_rate(rate: f64) -> String {
    format!("{}%", rate)
}

/// Capitalise the first letter of a raw category (e.g. "department" -> "Department")
pub fn format_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Distance with one decimal (e.g. 0.4)
pub fn format_miles(miles: f64) -> String {
    format!("{:.1}", miles)
}

/// Coordinates with four decimals (e.g. "42.1600, -87.9670")
pub fn format_coords(lat: f64, lng: f64) -> String {
    format!("{:.4}, {:.4}", lat, lng)
}

/// "1 bonus location" / "3 bonus locations"
pub fn format_location_count(count: usize) -> String {
    if count == 1 {
        "1 bonus location".to_string()
    } else {
        format!("{} bonus locations", count)
    }
}

/// First few merchants as "Name (d.d mi)" plus ", and K more"
pub fn format_nearby(merchants: &[Merchant]) -> String {
    let mut list = merchants
        .iter()
        .take(NEARBY_LISTED)
        .map(|m| format!("{} ({} mi)", m.name, format_miles(m.distance)))
        .collect::<Vec<_>>()
        .join(", ");

    if merchants.len() > NEARBY_LISTED {
        list.push_str(&format!(", and {} more", merchants.len() - NEARBY_LISTED));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant(name: &str, distance: f64) -> Merchant {
        Merchant {
            name: name.to_string(),
            category: "gas".to_string(),
            distance,
        }
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(3.0), "3%");
        assert_eq!(format_rate(1.5), "1.5%");
    }

    #[test]
    fn test_format_category() {
        assert_eq!(format_category("department"), "Department");
        assert_eq!(format_category(""), "");
    }

    #[test]
    fn test_format_coords_rounds_to_four_places() {
        assert_eq!(format_coords(42.16, -87.96712), "42.1600, -87.9671");
    }

    #[test]
    fn test_location_count_pluralises() {
        assert_eq!(format_location_count(1), "1 bonus location");
        assert_eq!(format_location_count(0), "0 bonus locations");
        assert_eq!(format_location_count(4), "4 bonus locations");
    }

    #[test]
    fn test_nearby_lists_first_five() {
        let few = vec![merchant("Shell", 0.32), merchant("BP", 1.0)];
        assert_eq!(format_nearby(&few), "Shell (0.3 mi), BP (1.0 mi)");

        let many: Vec<_> = (1..=7).map(|i| merchant(&format!("M{}", i), i as f64)).collect();
        assert_eq!(
            format_nearby(&many),
            "M1 (1.0 mi), M2 (2.0 mi), M3 (3.0 mi), M4 (4.0 mi), M5 (5.0 mi), and 2 more"
        );
    }
}
