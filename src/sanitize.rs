/// Cleans a city search string: keeps ASCII letters, digits and whitespace, collapses
/// whitespace runs and trims. Returns `None` when nothing usable is left.
///
/// # Arguments
///
/// * 'input' - raw search text
pub fn city_query(input: &str) -> Option<String> {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let city = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    if city.is_empty() { None } else { Some(city) }
}

/// Percent-encodes a cleaned city name for use as a path segment
///
/// # Arguments
///
/// * 'city' - output of `city_query`
pub fn path_segment(city: &str) -> String {
    city.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_trims() {
        assert_eq!(city_query("  New York!! "), Some("New York".into()));
        assert_eq!(city_query("<script>Paris</script>"), Some("scriptParisscript".into()));
        assert_eq!(city_query("Rio   de\tJaneiro"), Some("Rio de Janeiro".into()));
    }

    #[test]
    fn empty_or_symbol_only_input_is_rejected() {
        assert_eq!(city_query(""), None);
        assert_eq!(city_query("   "), None);
        assert_eq!(city_query("?!/%"), None);
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(city_query("São Paulo"), Some("So Paulo".into()));
        assert_eq!(city_query("تهران"), None);
    }

    #[test]
    fn encodes_spaces_for_paths() {
        assert_eq!(path_segment("New York"), "New%20York");
    }
}
