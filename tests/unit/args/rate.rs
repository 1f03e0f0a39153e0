use super::*;

#[test]
fn multiplier_and_percentage_scale_existing_durations() {
    assert_eq!(parse_rate_spec("2x", &[100, 40]).unwrap(), vec![50, 20]);
    assert_eq!(parse_rate_spec("0.5X", &[100]).unwrap(), vec![200]);
    assert_eq!(parse_rate_spec("50%", &[100, 40]).unwrap(), vec![200, 80]);
    assert_eq!(parse_rate_spec("200%", &[100]).unwrap(), vec![50]);
}

#[test]
fn absolute_rates_are_uniform() {
    assert_eq!(parse_rate_spec("25fps", &[10, 90]).unwrap(), vec![40, 40]);
    assert_eq!(parse_rate_spec("60FPS", &[10]).unwrap(), vec![17]);
    assert_eq!(parse_rate_spec("40ms", &[1, 2, 3]).unwrap(), vec![40, 40, 40]);
    assert_eq!(parse_rate_spec("2s", &[1]).unwrap(), vec![2000]);
    assert_eq!(parse_rate_spec("0.25s", &[1]).unwrap(), vec![250]);
}

#[test]
fn unmatched_or_zero_is_invalid_format() {
    for bad in ["fast", "0x", "0fps", "-2x", "2", "x"] {
        assert_eq!(
            parse_rate_spec(bad, &[100]).unwrap_err().key(),
            "invalid-arg-format",
            "{bad}"
        );
    }
}
