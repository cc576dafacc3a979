//! Deterministic frame colors.
//!
//! A frame's color depends only on its semantic identity (scope and
//! module), never on its position in the tree, so every call to the same
//! function renders with the same fill across renders and sessions.

use austin_web_protocol::{Color, Hsl};

use crate::model::FrameInfo;

/// Fill of frames whose name is a bare number (line-only or unresolved).
pub const NUMERIC_GREY: Color = Color::rgb(0x80, 0x80, 0x80);

/// Fill of frames matching the active search term.
pub const SEARCH_ACCENT: Color = Color::rgb(0xe6, 0x00, 0xe6);

/// Rolling string hash `h = c + ((h << 5) - h)` over UTF-16 code units,
/// in signed 32-bit wrapping arithmetic.
///
/// Hues and saturations are taken modulo this value, so the arithmetic
/// must wrap exactly like this for colors to match other renderers.
pub fn hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, unit| {
        i32::from(unit).wrapping_add(h.wrapping_shl(5).wrapping_sub(h))
    })
}

/// `|hash(s)| mod m`, without overflowing on `i32::MIN`.
fn hash_mod(s: &str, m: u32) -> u32 {
    hash(s).unsigned_abs() % m
}

/// Whether a frame name is a plain finite decimal number.
///
/// Accepted: optional sign, digits, optional fraction and exponent
/// (`42`, `-3.5`, `1e3`, `.5`). Rejected: surrounding whitespace, hex
/// literals and the special values (`Infinity`, `NaN`).
pub fn is_numeric_name(name: &str) -> bool {
    let starts_numeric = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    starts_numeric && name.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Maps frames to fill colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colorizer {
    source_extension: String,
}

impl Colorizer {
    /// `source_extension` marks modules of the profiled language itself
    /// (e.g. `.py`); those frames get more saturated colors than native
    /// or library frames.
    pub fn new(source_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn is_source_module(&self, file: &str) -> bool {
        !self.source_extension.is_empty() && file.ends_with(&self.source_extension)
    }

    /// The HSL triple for a frame with a resolved or absent module.
    pub fn hsl(&self, frame: &impl FrameInfo, highlighted: bool) -> Hsl {
        let Some(file) = frame.file() else {
            return Hsl::new(0.0, 10.0, if highlighted { 90.0 } else { 70.0 });
        };

        let scope = if frame.name().is_empty() {
            frame.key()
        } else {
            frame.name()
        };

        let marker_hue = match scope.chars().next() {
            Some('P') => Some(120.0),
            Some('T') => Some(240.0),
            _ => None,
        };

        match marker_hue {
            Some(hue) => Hsl::new(
                hue,
                f64::from(hash_mod(scope, 20)),
                if highlighted { 90.0 } else { 70.0 },
            ),
            None => {
                let base = if self.is_source_module(file) { 60 } else { 20 };
                Hsl::new(
                    f64::from(hash_mod(file, 360)),
                    f64::from(base + hash_mod(scope, 10)),
                    if highlighted { 80.0 } else { 60.0 },
                )
            }
        }
    }

    pub fn colorize(&self, frame: &impl FrameInfo, highlighted: bool) -> Color {
        if is_numeric_name(frame.name()) {
            return NUMERIC_GREY;
        }
        Color::from(self.hsl(frame, highlighted))
    }

    /// The fill the chart should paint: search matches take the accent,
    /// everything else its identity color.
    pub fn fill(&self, frame: &impl FrameInfo, highlighted: bool, search_match: bool) -> Color {
        if search_match {
            SEARCH_ACCENT
        } else {
            self.colorize(frame, highlighted)
        }
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new(".py")
    }
}

/// Colorize with the default (Python source) settings.
pub fn colorize(frame: &impl FrameInfo, highlighted: bool) -> Color {
    Colorizer::default().colorize(frame, highlighted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use austin_web_protocol::FrameData;
    use proptest::prelude::*;

    fn frame(name: &str, file: Option<&str>) -> FrameData {
        FrameData {
            name: name.to_string(),
            file: file.map(str::to_string),
            value: 1,
            children: Vec::new(),
        }
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(hash(""), 0);
        assert_eq!(hash("a"), 97);
        assert_eq!(hash("hello"), 99_162_322);
        assert_eq!(hash("hello world"), 1_794_106_052);
        assert_eq!(hash("foo.py"), -1_268_928_463);
    }

    #[test]
    fn hash_wraps_to_i32_min() {
        assert_eq!(hash("polygenelubricants"), i32::MIN);
        assert_eq!(hash_mod("polygenelubricants", 360), 128);
    }

    #[test]
    fn hash_uses_utf16_units() {
        assert_eq!(hash("é"), 233);
        // U+1F600 is a surrogate pair: 0xD83D, 0xDE00.
        assert_eq!(hash("😀"), 0xDE00 + 0xD83D * 31);
    }

    #[test]
    fn module_less_frames_are_grey() {
        assert_eq!(colorize(&frame("x", None), false).to_hex(), "#baabab");
        assert_eq!(colorize(&frame("x", None), true).to_hex(), "#e8e3e3");
        assert_eq!(
            colorize(&frame("Process", None), false),
            colorize(&frame("anything", None), false)
        );
    }

    #[test]
    fn default_branch_colors() {
        assert_eq!(colorize(&frame("foo", Some("foo.py")), false).to_hex(), "#7dda58");
        assert_eq!(colorize(&frame("foo", Some("foo.py")), true).to_hex(), "#beedab");
        assert_eq!(colorize(&frame("bar", Some("foo.py")), false).to_hex(), "#7bdf53");
        assert_eq!(
            colorize(&frame("main", Some("/usr/lib/python3.12/threading.py")), false).to_hex(),
            "#d7c25b"
        );
    }

    #[test]
    fn native_modules_are_less_saturated() {
        let colorizer = Colorizer::default();
        let py = colorizer.hsl(&frame("foo", Some("foo.py")), false);
        let so = colorizer.hsl(&frame("foo", Some("libc.so")), false);
        assert_eq!(py.s, 64.0);
        assert_eq!(so.s, 24.0);
        assert_eq!(colorize(&frame("foo", Some("libc.so")), false).to_hex(), "#81b1a4");
    }

    #[test]
    fn marker_scopes_use_fixed_hues() {
        let colorizer = Colorizer::default();
        let p = colorizer.hsl(&frame("Process", Some("foo.py")), false);
        assert_eq!((p.h, p.s, p.l), (120.0, 3.0, 70.0));
        let t = colorizer.hsl(&frame("Thread", Some("foo.py")), true);
        assert_eq!((t.h, t.s, t.l), (240.0, 6.0, 90.0));
        assert_eq!(colorize(&frame("Process", Some("foo.py")), false).to_hex(), "#b0b5b0");
        assert_eq!(colorize(&frame("Thread", Some("foo.py")), false).to_hex(), "#aeaeb7");
    }

    #[test]
    fn empty_name_falls_back_to_key() {
        struct Keyed;
        impl FrameInfo for Keyed {
            fn name(&self) -> &str {
                ""
            }
            fn file(&self) -> Option<&str> {
                Some("foo.py")
            }
            fn value(&self) -> u64 {
                0
            }
            fn key(&self) -> &str {
                "foo"
            }
        }
        assert_eq!(colorize(&Keyed, false), colorize(&frame("foo", Some("foo.py")), false));
    }

    #[test]
    fn numeric_names_are_flat_grey() {
        assert_eq!(colorize(&frame("42", Some("foo.py")), false), NUMERIC_GREY);
        assert_eq!(colorize(&frame("3.5", None), true), NUMERIC_GREY);
        assert_eq!(NUMERIC_GREY.to_hex(), "#808080");
        assert!(!is_numeric_name("inf"));
        assert!(!is_numeric_name("NaN"));
        assert!(!is_numeric_name("42abc"));
        assert!(!is_numeric_name(""));
        assert!(is_numeric_name("-3.5"));
        assert!(is_numeric_name("1e3"));
        assert!(is_numeric_name(".5"));
        assert!(!is_numeric_name("Infinity"));
        assert!(!is_numeric_name(" 42"));
        assert!(!is_numeric_name("42 "));
        assert!(!is_numeric_name("0x1F"));
    }

    #[test]
    fn search_match_overrides_everything() {
        let colorizer = Colorizer::default();
        assert_eq!(colorizer.fill(&frame("7", None), false, true), SEARCH_ACCENT);
        assert_eq!(
            colorizer.fill(&frame("foo", Some("foo.py")), true, false),
            colorizer.colorize(&frame("foo", Some("foo.py")), true)
        );
    }

    #[test]
    fn custom_source_extension() {
        let colorizer = Colorizer::new(".rb");
        assert!(colorizer.is_source_module("app.rb"));
        assert!(!colorizer.is_source_module("app.py"));
        assert!(!Colorizer::new("").is_source_module("app.py"));
    }

    #[test]
    fn modules_get_distinct_hues() {
        let colorizer = Colorizer::default();
        let hue = |file: &str| colorizer.hsl(&frame("main", Some(file)), false).h;

        assert_eq!(hue("foo.py"), 103.0);
        assert_eq!(hue("bar.py"), 148.0);
        assert_eq!(hue("/srv/app/app.py"), 147.0);
        assert_eq!(hue("/srv/app/loader.py"), 145.0);
        assert_ne!(
            colorize(&frame("main", Some("/srv/app/app.py")), false),
            colorize(&frame("main", Some("/srv/app/loader.py")), false)
        );

        let modules = [
            "foo.py",
            "bar.py",
            "app.py",
            "json.py",
            "loader.py",
            "/srv/app/app.py",
            "/srv/app/loader.py",
            "/usr/lib/python3.12/threading.py",
            "/usr/lib/python3.12/json/decoder.py",
        ];
        let mut hues: Vec<u32> = modules.iter().map(|&m| hue(m) as u32).collect();
        hues.sort_unstable();
        hues.dedup();
        assert_eq!(hues.len(), modules.len());

        let mut hues: Vec<u32> = (0..100)
            .map(|i| hue(&format!("/srv/app/module_{i}.py")) as u32)
            .collect();
        hues.sort_unstable();
        hues.dedup();
        assert_eq!(hues.len(), 100);
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z_<>][a-zA-Z0-9_.<> ]{0,24}"
    }

    proptest! {
        #[test]
        fn colorize_is_pure(
            name in name_strategy(),
            file in proptest::option::of("[a-z/_]{1,20}\\.(py|so|c)"),
            highlighted in any::<bool>(),
        ) {
            let f = frame(&name, file.as_deref());
            let first = colorize(&f, highlighted).to_hex();
            let second = colorize(&f.clone(), highlighted).to_hex();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn module_less_frames_ignore_name(name in name_strategy(), highlighted in any::<bool>()) {
            let expected = if highlighted { "#e8e3e3" } else { "#baabab" };
            prop_assert_eq!(colorize(&frame(&name, None), highlighted).to_hex(), expected);
        }

        #[test]
        fn numeric_names_ignore_module(n in any::<u32>(), file in "[a-z]{1,8}\\.py") {
            prop_assert_eq!(colorize(&frame(&n.to_string(), Some(file.as_str())), false), NUMERIC_GREY);
        }

        #[test]
        fn hue_depends_only_on_module(a in "[a-oq-su-z][a-z]{0,10}", b in "[a-oq-su-z][a-z]{0,10}") {
            let colorizer = Colorizer::default();
            let ha = colorizer.hsl(&frame(&a, Some("mod.py")), false);
            let hb = colorizer.hsl(&frame(&b, Some("mod.py")), false);
            prop_assert_eq!(ha.h, hb.h);
        }
    }
}
