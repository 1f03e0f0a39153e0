use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
}

#[test]
fn premultiply_roundtrips_opaque_and_clears_transparent() {
    assert_eq!(premultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(premultiply([10, 20, 30, 0]), [0, 0, 0, 0]);
    let p = premultiply([200, 100, 50, 128]);
    let s = unpremultiply(p);
    for i in 0..3 {
        assert!((i32::from(s[i]) - [200, 100, 50][i]).abs() <= 2);
    }
    assert_eq!(s[3], 128);
}

#[test]
fn luma_of_primaries() {
    assert_eq!(luma601(255, 0, 0), 76);
    assert_eq!(luma601(0, 255, 0), 150);
    assert_eq!(luma601(255, 255, 255), 255);
}
