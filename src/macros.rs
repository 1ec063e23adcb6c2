// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Anything `String: From` accepts (literals, consts, &str vars)
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Compile a CSS selector once per call site and hand back a `&'static Selector`.
/// Only for literal selectors; a typo is a programming error, not a runtime condition.
#[macro_export]
macro_rules! sel {
    ($css:literal) => {{
        static SELECTOR: ::std::sync::OnceLock<::scraper::Selector> = ::std::sync::OnceLock::new();
        SELECTOR.get_or_init(|| {
            ::scraper::Selector::parse($css).expect(concat!("static CSS selector is valid: ", $css))
        })
    }};
}

/// Declare a flat record whose fields are filled by position.
///
/// Generates the struct (every field a `String`, serialized under its key),
/// a header constant listing the keys in order, `from_values` which zips a
/// value sequence onto that order, and `values` which reads it back.
#[macro_export]
macro_rules! positional_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
        pub const $header:ident = {
            $( $field:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(
                #[serde(rename = $key)]
                pub $field: ::std::string::String,
            )+
        }

        pub const $header: &[&str] = &[ $( $key ),+ ];

        impl $name {
            /// Missing trailing values stay empty; surplus values are ignored.
            pub fn from_values<I>(values: I) -> Self
            where
                I: IntoIterator<Item = ::std::string::String>,
            {
                let mut it = values.into_iter();
                Self { $( $field: it.next().unwrap_or_default(), )+ }
            }

            pub fn values(&self) -> ::std::vec::Vec<&str> {
                vec![ $( self.$field.as_str() ),+ ]
            }
        }
    };
}
