//! Builtin guide names derived from the target box
//!
//! Values are in shape-local coordinates: `l` and `t` are 0, `r` and `b` are
//! the box width and height. The box origin is applied later by the
//! geometry builder.

use super::defaults::FULL_TURN;

macro_rules! builtins {
    (|$w:ident, $h:ident| { $($variant:ident $name:literal => $value:expr,)* }) => {
        /// A builtin guide. The declaration order fixes its slot index.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $($variant,)*
        }

        impl Builtin {
            /// Every builtin, in slot order
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant,)*];

            /// Name as referenced from formulas
            pub fn name(self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name,)*
                }
            }

            /// Value for a box of width `w` and height `h`
            pub fn value(self, $w: f64, $h: f64) -> f64 {
                match self {
                    $(Builtin::$variant => $value,)*
                }
            }
        }
    };
}

// Names must match the DrawingML builtin set exactly.
builtins!(|w, h| {
    L "l" => 0.0,
    T "t" => 0.0,
    R "r" => w,
    B "b" => h,
    W "w" => w,
    H "h" => h,
    Hc "hc" => w / 2.0,
    Vc "vc" => h / 2.0,
    Ss "ss" => w.min(h),
    Ls "ls" => w.max(h),
    Wd2 "wd2" => w / 2.0,
    Wd3 "wd3" => w / 3.0,
    Wd4 "wd4" => w / 4.0,
    Wd5 "wd5" => w / 5.0,
    Wd6 "wd6" => w / 6.0,
    Wd8 "wd8" => w / 8.0,
    Wd10 "wd10" => w / 10.0,
    Wd12 "wd12" => w / 12.0,
    Wd32 "wd32" => w / 32.0,
    Hd2 "hd2" => h / 2.0,
    Hd3 "hd3" => h / 3.0,
    Hd4 "hd4" => h / 4.0,
    Hd5 "hd5" => h / 5.0,
    Hd6 "hd6" => h / 6.0,
    Hd8 "hd8" => h / 8.0,
    Ssd2 "ssd2" => w.min(h) / 2.0,
    Ssd4 "ssd4" => w.min(h) / 4.0,
    Ssd6 "ssd6" => w.min(h) / 6.0,
    Ssd8 "ssd8" => w.min(h) / 8.0,
    Ssd16 "ssd16" => w.min(h) / 16.0,
    Ssd32 "ssd32" => w.min(h) / 32.0,
    Cd2 "cd2" => FULL_TURN / 2.0,
    Cd4 "cd4" => FULL_TURN / 4.0,
    Cd8 "cd8" => FULL_TURN / 8.0,
    ThreeCd4 "3cd4" => FULL_TURN * 3.0 / 4.0,
    ThreeCd8 "3cd8" => FULL_TURN * 3.0 / 8.0,
    FiveCd8 "5cd8" => FULL_TURN * 5.0 / 8.0,
    SevenCd8 "7cd8" => FULL_TURN * 7.0 / 8.0,
});

/// Number of builtin slots at the start of every value table
pub const BUILTIN_COUNT: usize = Builtin::ALL.len();

impl Builtin {
    /// Look a builtin up by name
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Slot index of this builtin
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Append the builtin values for a `w` × `h` box, in slot order.
pub(crate) fn push_builtins(values: &mut Vec<f64>, w: f64, h: f64) {
    values.extend(Builtin::ALL.iter().map(|b| b.value(w, h)));
}
