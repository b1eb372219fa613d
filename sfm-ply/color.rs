/// A color component that can be stored as a PLY `uchar`
///
/// Fractional values are truncated toward zero, never rounded.
pub trait ColorChannel: Copy {
    fn to_uchar(self) -> Option<u8>;

    /// Value used when reporting a channel that does not fit
    fn as_f64(self) -> f64;
}

impl ColorChannel for u8 {
    fn to_uchar(self) -> Option<u8> {
        Some(self)
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! integer_channel {
    ($($t:ty),*) => {
        $(
            impl ColorChannel for $t {
                fn to_uchar(self) -> Option<u8> {
                    u8::try_from(self).ok()
                }

                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

integer_channel!(u16, u32, i32, i64);

impl ColorChannel for f64 {
    fn to_uchar(self) -> Option<u8> {
        let t = self.trunc();
        if t.is_finite() && (0.0..=255.0).contains(&t) {
            Some(t as u8)
        } else {
            None
        }
    }

    fn as_f64(self) -> f64 {
        self
    }
}

impl ColorChannel for f32 {
    fn to_uchar(self) -> Option<u8> {
        (self as f64).to_uchar()
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_truncates() {
        assert_eq!(255.9f64.to_uchar(), Some(255));
        assert_eq!(0.99f32.to_uchar(), Some(0));
        assert_eq!(127.5f64.to_uchar(), Some(127));
        assert_eq!((-0.5f64).to_uchar(), Some(0));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(256.0f64.to_uchar(), None);
        assert_eq!((-1.0f32).to_uchar(), None);
        assert_eq!(f64::NAN.to_uchar(), None);
        assert_eq!(f32::INFINITY.to_uchar(), None);
        assert_eq!(300i32.to_uchar(), None);
        assert_eq!((-3i64).to_uchar(), None);
    }

    #[test]
    fn test_integers_pass_through() {
        assert_eq!(200u8.to_uchar(), Some(200));
        assert_eq!(255u16.to_uchar(), Some(255));
        assert_eq!(0i32.to_uchar(), Some(0));
    }
}
