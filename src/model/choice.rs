//! Closed option enumerations and their serialized tokens.

/// Which project file schema a value is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Inline `.vcproj` (VS2002-VS2008): numeric enum values, attributes.
    Vcproj,
    /// MSBuild `.vcxproj` (VS2010+): symbolic values, elements.
    Vcxproj,
}

/// A closed enumeration with a designated `NotSet` member.
pub trait Choice: Copy + Default + PartialEq {
    /// Serialized token, `None` for `NotSet` or when the dialect has no spelling.
    fn token(self, dialect: Dialect) -> Option<&'static str>;

    fn is_set(self) -> bool {
        self != Self::default()
    }
}

/// Declares an option enum whose first member is `NotSet`.
/// Each variant maps to its `(vcproj, vcxproj)` token; an empty token means
/// the dialect cannot express it.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($legacy:expr, $msbuild:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            #[default]
            NotSet,
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::model::Choice for $name {
            fn token(self, dialect: $crate::model::Dialect) -> Option<&'static str> {
                let (legacy, msbuild): (&'static str, &'static str) = match self {
                    $name::NotSet => return None,
                    $($name::$variant => ($legacy, $msbuild)),+
                };
                let token = match dialect {
                    $crate::model::Dialect::Vcproj => legacy,
                    $crate::model::Dialect::Vcxproj => msbuild,
                };
                (!token.is_empty()).then_some(token)
            }
        }
    };
}
