//! Fleet composition strings.
//!
//! A spec is a comma-separated list of entries, each either a bare rarity
//! key (`3`) or a count-times-rarity pair (`2x3`). `"1,1,3"` and `"2x1,3"`
//! describe the same two-common-one-rare fleet.

use anyhow::{Context, Result, bail};
use fleetsim_core::Rarity;

pub fn parse_fleet_spec(spec: &str) -> Result<Vec<Rarity>> {
    let mut fleet = Vec::new();
    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((count_part, rarity_part)) = token.split_once(['x', 'X']) {
            let count: usize = count_part
                .trim()
                .parse()
                .with_context(|| format!("invalid truck count in '{token}'"))?;
            if count == 0 {
                bail!("truck count must be positive in '{token}'");
            }
            let rarity = parse_rarity(rarity_part.trim(), token)?;
            fleet.extend(std::iter::repeat_n(rarity, count));
        } else {
            fleet.push(parse_rarity(token, token)?);
        }
    }
    if fleet.is_empty() {
        bail!("fleet spec '{spec}' contains no trucks");
    }
    Ok(fleet)
}

fn parse_rarity(text: &str, token: &str) -> Result<Rarity> {
    let key: u8 = text
        .parse()
        .with_context(|| format!("invalid rarity in '{token}'"))?;
    Rarity::try_from(key).with_context(|| format!("invalid rarity in '{token}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_keys_parse_in_order() {
        let fleet = parse_fleet_spec("1,1,3").unwrap();
        assert_eq!(fleet, vec![Rarity::Common, Rarity::Common, Rarity::Rare]);
    }

    #[test]
    fn count_pairs_expand() {
        let fleet = parse_fleet_spec("2x1,1x5").unwrap();
        assert_eq!(
            fleet,
            vec![Rarity::Common, Rarity::Common, Rarity::Legendary]
        );
    }

    #[test]
    fn whitespace_and_empty_entries_are_tolerated() {
        let fleet = parse_fleet_spec(" 2 X 4 , , 5 ").unwrap();
        assert_eq!(fleet, vec![Rarity::Epic, Rarity::Epic, Rarity::Legendary]);
    }

    #[test]
    fn out_of_range_rarity_is_rejected() {
        let err = parse_fleet_spec("1,9").unwrap_err();
        assert!(err.to_string().contains("invalid rarity in '9'"));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(parse_fleet_spec("0x3").is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(parse_fleet_spec("legendary").is_err());
        assert!(parse_fleet_spec("2x").is_err());
    }

    #[test]
    fn blank_spec_is_rejected() {
        assert!(parse_fleet_spec("  ,  ").is_err());
    }
}
