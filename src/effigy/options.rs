//! 🎭 Option schema - avatar customization categories
//!
//! Every category is a closed enum with a total string mapping.
//! Raw selections arrive as strings and are resolved by the builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Failed lookup of a raw value inside one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub category: Category,
    pub value: String,
}

/// Declares an option enum with its wire names in selector order.
/// The first variant is the default selection.
macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident, $category:expr, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownOption {
                        category: $category,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

option_enum!(
    /// Background treatment
    AvatarStyle, Category::Style, {
        Circle => "CIRCLE",
        Transparent => "TRANSPARENT",
    }
);

option_enum!(SkinColor, Category::SkinColor, {
    Tanned => "TANNED",
    Yellow => "YELLOW",
    Pale => "PALE",
    Light => "LIGHT",
    Brown => "BROWN",
    DarkBrown => "DARK_BROWN",
    Black => "BLACK",
});

option_enum!(TopType, Category::TopType, {
    NoHair => "NO_HAIR",
    LongHairBob => "LONG_HAIR_BOB",
    ShortHairTheCaesar => "SHORT_HAIR_THE_CAESAR",
    Hijab => "HIJAB",
});

option_enum!(HairColor, Category::HairColor, {
    Auburn => "AUBURN",
    Black => "BLACK",
    Blonde => "BLONDE",
    Brown => "BROWN",
    Red => "RED",
    SilverGray => "SILVER_GRAY",
});

option_enum!(ClotheType, Category::ClotheType, {
    BlazerShirt => "BLAZER_SHIRT",
    GraphicShirt => "GRAPHIC_SHIRT",
    Hoodie => "HOODIE",
});

option_enum!(
    /// Print on the shirt; only visible on `GraphicShirt`
    ClotheGraphicType, Category::ClotheGraphicType, {
        Bat => "BAT",
        Diamond => "DIAMOND",
        Hola => "HOLA",
        Skull => "SKULL",
    }
);

option_enum!(MouthType, Category::MouthType, {
    Default => "DEFAULT",
    Smile => "SMILE",
    Tongue => "TONGUE",
    Serious => "SERIOUS",
});

option_enum!(EyeType, Category::EyeType, {
    Default => "DEFAULT",
    Happy => "HAPPY",
    Surprised => "SURPRISED",
    Wink => "WINK",
});

option_enum!(EyebrowType, Category::EyebrowType, {
    Default => "DEFAULT",
    RaisedExcited => "RAISED_EXCITED",
    FrownNatural => "FROWN_NATURAL",
});

option_enum!(
    /// `Default` means no accessory
    AccessoriesType, Category::AccessoriesType, {
        Default => "DEFAULT",
        Sunglasses => "SUNGLASSES",
        Prescription01 => "PRESCRIPTION_01",
    }
);

/// The ten customization categories, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Style,
    SkinColor,
    TopType,
    HairColor,
    ClotheType,
    ClotheGraphicType,
    MouthType,
    EyeType,
    EyebrowType,
    AccessoriesType,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Style,
        Category::SkinColor,
        Category::TopType,
        Category::HairColor,
        Category::ClotheType,
        Category::ClotheGraphicType,
        Category::MouthType,
        Category::EyeType,
        Category::EyebrowType,
        Category::AccessoriesType,
    ];

    /// Key used in option maps and config files
    pub fn key(&self) -> &'static str {
        match self {
            Category::Style => "style",
            Category::SkinColor => "skin_color",
            Category::TopType => "top_type",
            Category::HairColor => "hair_color",
            Category::ClotheType => "clothe_type",
            Category::ClotheGraphicType => "clothe_graphic_type",
            Category::MouthType => "mouth_type",
            Category::EyeType => "eye_type",
            Category::EyebrowType => "eyebrow_type",
            Category::AccessoriesType => "accessories_type",
        }
    }

    /// Human label shown next to the selector
    pub fn label(&self) -> &'static str {
        match self {
            Category::Style => "Style",
            Category::SkinColor => "Skin Color",
            Category::TopType => "Head Top",
            Category::HairColor => "Hair Color",
            Category::ClotheType => "Clothing Type",
            Category::ClotheGraphicType => "Clothing Graphic",
            Category::MouthType => "Mouth Type",
            Category::EyeType => "Eye Type",
            Category::EyebrowType => "Eyebrow Type",
            Category::AccessoriesType => "Accessories",
        }
    }

    /// Allowed wire values, first one is the default
    pub fn values(&self) -> Vec<&'static str> {
        fn names<T: Copy>(all: &[T], f: fn(&T) -> &'static str) -> Vec<&'static str> {
            all.iter().map(f).collect()
        }
        match self {
            Category::Style => names(AvatarStyle::ALL, AvatarStyle::as_str),
            Category::SkinColor => names(SkinColor::ALL, SkinColor::as_str),
            Category::TopType => names(TopType::ALL, TopType::as_str),
            Category::HairColor => names(HairColor::ALL, HairColor::as_str),
            Category::ClotheType => names(ClotheType::ALL, ClotheType::as_str),
            Category::ClotheGraphicType => {
                names(ClotheGraphicType::ALL, ClotheGraphicType::as_str)
            }
            Category::MouthType => names(MouthType::ALL, MouthType::as_str),
            Category::EyeType => names(EyeType::ALL, EyeType::as_str),
            Category::EyebrowType => names(EyebrowType::ALL, EyebrowType::as_str),
            Category::AccessoriesType => names(AccessoriesType::ALL, AccessoriesType::as_str),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw user selection, one string per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarOptions {
    selections: BTreeMap<Category, String>,
}

impl Default for AvatarOptions {
    /// First value of every category, like a fresh sidebar
    fn default() -> Self {
        let selections = Category::ALL
            .iter()
            .map(|c| (*c, c.values()[0].to_string()))
            .collect();
        Self { selections }
    }
}

impl AvatarOptions {
    /// Options with no selection at all
    pub fn empty() -> Self {
        Self {
            selections: BTreeMap::new(),
        }
    }

    pub fn with(mut self, category: Category, value: impl Into<String>) -> Self {
        self.set(category, value);
        self
    }

    pub fn set(&mut self, category: Category, value: impl Into<String>) {
        self.selections.insert(category, value.into());
    }

    /// Selected value, `None` when missing or blank
    pub fn get(&self, category: Category) -> Option<&str> {
        self.selections
            .get(&category)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

}

#[cfg(test)]
impl AvatarOptions {
    /// Pale, bald, black-haired avatar in a skull hoodie, smiling
    pub fn example() -> Self {
        Self::empty()
            .with(Category::Style, "CIRCLE")
            .with(Category::SkinColor, "PALE")
            .with(Category::TopType, "NO_HAIR")
            .with(Category::HairColor, "BLACK")
            .with(Category::ClotheType, "HOODIE")
            .with(Category::ClotheGraphicType, "SKULL")
            .with(Category::MouthType, "SMILE")
            .with(Category::EyeType, "DEFAULT")
            .with(Category::EyebrowType, "DEFAULT")
            .with(Category::AccessoriesType, "DEFAULT")
    }
}
