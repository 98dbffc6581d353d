//! Macros for defining kind enums.

/// Macro for defining a kind enum stored as `INT2` and rendered as
/// `SCREAMING_SNAKE_CASE`.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Pillar shape."]
///     enum Shape {
///         #[doc = "A cube."]
///         Cube = 1,
///
///         #[doc = "A cylinder."]
///         Cylinder = 2,
///     }
/// }
///
/// assert_eq!(Shape::Cylinder.to_string(), "CYLINDER");
/// assert_eq!("CUBE".parse::<Shape>().unwrap(), Shape::Cube);
/// assert_eq!(Shape::from_u8(2), Some(Shape::Cylinder));
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Looks up the variant with the provided [`u8`] representation.
            #[must_use]
            pub const fn from_u8(v: u8) -> Option<Self> {
                match v {
                    $(
                        v if v == Self::$variant.u8() => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &[u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                let v = u8::try_from(
                    <i16 as $crate::private::postgres_types::FromSql<'_>>::from_sql(
                        ty, raw,
                    )?,
                )?;
                Self::from_u8(v).ok_or_else(|| {
                    ::std::format!(
                        "invalid `{}` value: {v}",
                        ::core::stringify!($name),
                    )
                    .into()
                })
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                $crate::private::postgres_types::ToSql::to_sql(
                    &i16::from(self.u8()),
                    ty,
                    w,
                )
            }
        }
    };
}

#[cfg(test)]
mod spec {
    crate::define_kind! {
        #[doc = "Test kind."]
        enum Beacon {
            #[doc = "Concrete beacon."]
            Concrete = 1,

            #[doc = "Iron rod beacon."]
            IronRod = 2,
        }
    }

    #[test]
    fn renders_screaming_snake_case() {
        assert_eq!(Beacon::Concrete.to_string(), "CONCRETE");
        assert_eq!(Beacon::IronRod.to_string(), "IRON_ROD");
    }

    #[test]
    fn parses_screaming_snake_case() {
        assert_eq!("IRON_ROD".parse::<Beacon>().unwrap(), Beacon::IronRod);
        assert!("iron rod".parse::<Beacon>().is_err());
    }

    #[test]
    fn maps_u8_representation() {
        assert_eq!(Beacon::IronRod.u8(), 2);
        assert_eq!(Beacon::from_u8(1), Some(Beacon::Concrete));
        assert_eq!(Beacon::from_u8(0), None);
        assert_eq!(Beacon::from_u8(3), None);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn rejects_unknown_sql_value() {
        use crate::private::postgres_types::{FromSql as _, Type};

        assert_eq!(
            Beacon::from_sql(&Type::INT2, &2_i16.to_be_bytes()).unwrap(),
            Beacon::IronRod,
        );
        for v in [0_i16, 3, -1] {
            assert!(Beacon::from_sql(&Type::INT2, &v.to_be_bytes()).is_err());
        }
    }
}
