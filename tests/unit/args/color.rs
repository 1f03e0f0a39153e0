use super::*;

#[test]
fn hex_forms() {
    assert_eq!(parse_color("#ff0000").unwrap(), Rgba::new(255, 0, 0, 255));
    assert_eq!(parse_color("00FF00").unwrap(), Rgba::new(0, 255, 0, 255));
    assert_eq!(parse_color("#f00").unwrap(), Rgba::new(255, 0, 0, 255));
    assert_eq!(parse_color("#f008").unwrap(), Rgba::new(255, 0, 0, 136));
    assert_eq!(parse_color("#0000ff80").unwrap(), Rgba::new(0, 0, 255, 128));
}

#[test]
fn functional_forms() {
    assert_eq!(
        parse_color("rgba(0,0,0,0.5)").unwrap(),
        Rgba::new(0, 0, 0, 128)
    );
    assert_eq!(
        parse_color("rgb(10 20 30)").unwrap(),
        Rgba::new(10, 20, 30, 255)
    );
    assert_eq!(
        parse_color("RGBA(1, 2, 3, 200)").unwrap(),
        Rgba::new(1, 2, 3, 200)
    );
}

#[test]
fn rejects_bad_input() {
    for bad in [
        "bogus",
        "#12",
        "#ggg",
        "rgb(256, 0, 0)",
        "rgb(1, 2)",
        "rgba(1, 2, 3, 300)",
        "rgba(1, 2, 3, 1.5)",
        "rgb(1, 2, 3",
    ] {
        let err = parse_color(bad).unwrap_err();
        assert_eq!(err.key(), "invalid-color", "{bad}");
        assert_eq!(err.params(), vec![bad.to_string()]);
    }
}

#[test]
fn opaque_requirement() {
    assert!(parse_opaque_color("#123456").is_ok());
    let err = parse_opaque_color("rgba(1, 2, 3, 0.5)").unwrap_err();
    assert_eq!(err.key(), "alpha-not-supported");
}
