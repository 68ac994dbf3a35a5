//! 🎨 Avatar builder
//!
//! Resolves raw selections into typed parts and rasterizes them.
//! Building never touches the filesystem.

use image::{Rgba, RgbaImage};
use serde::Serialize;
use thiserror::Error;

use super::canvas::{rgb, rgba, Canvas};
use super::options::{
    AccessoriesType, AvatarOptions, AvatarStyle, Category, ClotheGraphicType, ClotheType,
    EyeType, EyebrowType, HairColor, MouthType, SkinColor, TopType, UnknownOption,
};

pub const AVATAR_WIDTH: u32 = 264;
pub const AVATAR_HEIGHT: u32 = 280;

/// Why a selection could not become an avatar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarConstructionError {
    #[error("no value selected for '{0}'")]
    MissingSelection(Category),
    #[error("'{value}' is not a valid {category} (expected one of: {expected})")]
    UnknownValue {
        category: Category,
        value: String,
        expected: String,
    },
}

impl From<UnknownOption> for AvatarConstructionError {
    fn from(err: UnknownOption) -> Self {
        AvatarConstructionError::UnknownValue {
            category: err.category,
            expected: err.category.values().join(", "),
            value: err.value,
        }
    }
}

/// Fully resolved avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub style: AvatarStyle,
    pub skin_color: SkinColor,
    pub top_type: TopType,
    pub hair_color: HairColor,
    pub clothe_type: ClotheType,
    pub clothe_graphic_type: ClotheGraphicType,
    pub mouth_type: MouthType,
    pub eye_type: EyeType,
    pub eyebrow_type: EyebrowType,
    pub accessories_type: AccessoriesType,
}

fn resolve<T>(options: &AvatarOptions, category: Category) -> Result<T, AvatarConstructionError>
where
    T: std::str::FromStr<Err = UnknownOption>,
{
    let raw = options
        .get(category)
        .ok_or(AvatarConstructionError::MissingSelection(category))?;
    Ok(raw.parse::<T>()?)
}

pub struct AvatarBuilder;

impl AvatarBuilder {
    /// All-or-nothing: the first unresolvable category aborts the build
    pub fn build(options: &AvatarOptions) -> Result<Avatar, AvatarConstructionError> {
        let avatar = Avatar {
            style: resolve(options, Category::Style)?,
            skin_color: resolve(options, Category::SkinColor)?,
            top_type: resolve(options, Category::TopType)?,
            hair_color: resolve(options, Category::HairColor)?,
            clothe_type: resolve(options, Category::ClotheType)?,
            clothe_graphic_type: resolve(options, Category::ClotheGraphicType)?,
            mouth_type: resolve(options, Category::MouthType)?,
            eye_type: resolve(options, Category::EyeType)?,
            eyebrow_type: resolve(options, Category::EyebrowType)?,
            accessories_type: resolve(options, Category::AccessoriesType)?,
        };
        tracing::debug!(?avatar, "avatar resolved");
        Ok(avatar)
    }
}

// Palette

const BACKGROUND: Rgba<u8> = rgb(0x65C9FF);
const OUTLINE: Rgba<u8> = rgba(0x000000, 40);
const INK: Rgba<u8> = rgba(0x000000, 190);
const WHITE: Rgba<u8> = rgb(0xFFFFFF);
const TONGUE: Rgba<u8> = rgb(0xFF4F6D);
const HIJAB_FABRIC: Rgba<u8> = rgb(0x3C4F5C);
const SHIRT: Rgba<u8> = rgb(0xE6E6E6);

impl SkinColor {
    pub fn rgba(&self) -> Rgba<u8> {
        match self {
            SkinColor::Tanned => rgb(0xFD9841),
            SkinColor::Yellow => rgb(0xF8D25C),
            SkinColor::Pale => rgb(0xFFDBB4),
            SkinColor::Light => rgb(0xEDB98A),
            SkinColor::Brown => rgb(0xD08B5B),
            SkinColor::DarkBrown => rgb(0xAE5D29),
            SkinColor::Black => rgb(0x614335),
        }
    }
}

impl HairColor {
    pub fn rgba(&self) -> Rgba<u8> {
        match self {
            HairColor::Auburn => rgb(0xA55728),
            HairColor::Black => rgb(0x2C1B18),
            HairColor::Blonde => rgb(0xB58143),
            HairColor::Brown => rgb(0x724133),
            HairColor::Red => rgb(0xC93305),
            HairColor::SilverGray => rgb(0xE8E1E1),
        }
    }
}

impl ClotheType {
    fn rgba(&self) -> Rgba<u8> {
        match self {
            ClotheType::BlazerShirt => rgb(0x262E33),
            ClotheType::GraphicShirt => rgb(0x5199E4),
            ClotheType::Hoodie => rgb(0x929598),
        }
    }
}

// Layout, in canvas pixels
const CX: f32 = 132.0;
const HEAD_CY: f32 = 110.0;
const HEAD_RX: f32 = 56.0;
const HEAD_RY: f32 = 64.0;
const EYE_Y: f32 = 106.0;
const EYE_DX: f32 = 22.0;

impl Avatar {
    /// Rasterizes the avatar, back to front
    pub fn render(&self) -> RgbaImage {
        let mut canvas = Canvas::new(AVATAR_WIDTH, AVATAR_HEIGHT);

        if self.style == AvatarStyle::Circle {
            canvas.fill_circle(CX, 148.0, 120.0, BACKGROUND);
        }
        self.draw_back_hair(&mut canvas);
        self.draw_body(&mut canvas);
        self.draw_head(&mut canvas);
        self.draw_top(&mut canvas);
        self.draw_eyebrows(&mut canvas);
        self.draw_eyes(&mut canvas);
        self.draw_mouth(&mut canvas);
        self.draw_accessories(&mut canvas);

        canvas.into_image()
    }

    fn draw_back_hair(&self, canvas: &mut Canvas) {
        match self.top_type {
            TopType::LongHairBob => {
                canvas.fill_rect(CX - 70.0, HEAD_CY - 20.0, 140.0, 96.0, self.hair_color.rgba());
                canvas.fill_ellipse(CX, HEAD_CY - 10.0, 70.0, 76.0, self.hair_color.rgba());
            }
            TopType::Hijab => {
                canvas.fill_ellipse(CX, HEAD_CY + 10.0, 74.0, 92.0, HIJAB_FABRIC);
            }
            TopType::NoHair | TopType::ShortHairTheCaesar => {}
        }
    }

    fn draw_body(&self, canvas: &mut Canvas) {
        let skin = self.skin_color.rgba();
        // neck
        canvas.fill_rect(CX - 18.0, HEAD_CY + 44.0, 36.0, 48.0, skin);
        canvas.fill_rect(CX - 18.0, HEAD_CY + 60.0, 36.0, 8.0, OUTLINE);

        let cloth = self.clothe_type.rgba();
        canvas.fill_upper_half_ellipse(CX, 280.0, 100.0, 76.0, cloth);
        canvas.fill_rect(CX - 100.0, 272.0, 200.0, 8.0, cloth);

        match self.clothe_type {
            ClotheType::BlazerShirt => {
                canvas.fill_polygon(
                    &[(CX - 22.0, 206.0), (CX + 22.0, 206.0), (CX, 250.0)],
                    SHIRT,
                );
                canvas.line(CX - 22.0, 206.0, CX - 8.0, 268.0, 4.0, OUTLINE);
                canvas.line(CX + 22.0, 206.0, CX + 8.0, 268.0, 4.0, OUTLINE);
            }
            ClotheType::GraphicShirt => {
                canvas.fill_lower_half_ellipse(CX, 204.0, 22.0, 10.0, skin);
                self.draw_graphic(canvas, CX, 246.0);
            }
            ClotheType::Hoodie => {
                canvas.fill_lower_half_ellipse(CX, 204.0, 26.0, 14.0, skin);
                canvas.line(CX - 16.0, 216.0, CX - 16.0, 254.0, 3.0, WHITE);
                canvas.line(CX + 16.0, 216.0, CX + 16.0, 254.0, 3.0, WHITE);
            }
        }
    }

    fn draw_graphic(&self, canvas: &mut Canvas, x: f32, y: f32) {
        match self.clothe_graphic_type {
            ClotheGraphicType::Bat => {
                canvas.fill_ellipse(x, y, 8.0, 6.0, INK);
                canvas.fill_polygon(&[(x - 6.0, y - 2.0), (x - 26.0, y - 8.0), (x - 18.0, y + 6.0)], INK);
                canvas.fill_polygon(&[(x + 6.0, y - 2.0), (x + 26.0, y - 8.0), (x + 18.0, y + 6.0)], INK);
            }
            ClotheGraphicType::Diamond => {
                canvas.fill_polygon(
                    &[(x, y - 14.0), (x + 12.0, y), (x, y + 14.0), (x - 12.0, y)],
                    WHITE,
                );
            }
            ClotheGraphicType::Hola => {
                canvas.fill_rect(x - 24.0, y - 9.0, 48.0, 18.0, WHITE);
                for i in 0..4 {
                    canvas.fill_rect(x - 20.0 + i as f32 * 11.0, y - 5.0, 7.0, 10.0, INK);
                }
            }
            ClotheGraphicType::Skull => {
                canvas.fill_circle(x, y - 2.0, 12.0, WHITE);
                canvas.fill_rect(x - 6.0, y + 6.0, 12.0, 8.0, WHITE);
                canvas.fill_circle(x - 4.5, y - 3.0, 3.0, INK);
                canvas.fill_circle(x + 4.5, y - 3.0, 3.0, INK);
            }
        }
    }

    fn draw_head(&self, canvas: &mut Canvas) {
        let skin = self.skin_color.rgba();
        canvas.fill_circle(CX - HEAD_RX, EYE_Y + 6.0, 10.0, skin);
        canvas.fill_circle(CX + HEAD_RX, EYE_Y + 6.0, 10.0, skin);
        canvas.fill_ellipse(CX, HEAD_CY, HEAD_RX, HEAD_RY, skin);
    }

    fn draw_top(&self, canvas: &mut Canvas) {
        let hair = self.hair_color.rgba();
        match self.top_type {
            TopType::NoHair => {}
            TopType::ShortHairTheCaesar => {
                canvas.fill_upper_half_ellipse(CX, HEAD_CY - 26.0, HEAD_RX + 2.0, 44.0, hair);
                canvas.fill_rect(CX - HEAD_RX - 2.0, HEAD_CY - 28.0, 14.0, 20.0, hair);
                canvas.fill_rect(CX + HEAD_RX - 12.0, HEAD_CY - 28.0, 14.0, 20.0, hair);
            }
            TopType::LongHairBob => {
                canvas.fill_upper_half_ellipse(CX, HEAD_CY - 20.0, HEAD_RX + 8.0, 52.0, hair);
            }
            TopType::Hijab => {
                // fabric frames the face
                canvas.fill_upper_half_ellipse(CX, HEAD_CY - 30.0, HEAD_RX + 10.0, 48.0, HIJAB_FABRIC);
                canvas.fill_rect(CX - HEAD_RX - 10.0, HEAD_CY - 32.0, 14.0, 90.0, HIJAB_FABRIC);
                canvas.fill_rect(CX + HEAD_RX - 4.0, HEAD_CY - 32.0, 14.0, 90.0, HIJAB_FABRIC);
            }
        }
    }

    fn draw_eyebrows(&self, canvas: &mut Canvas) {
        let y = EYE_Y - 18.0;
        for side in [-1.0f32, 1.0] {
            let x = CX + side * EYE_DX;
            match self.eyebrow_type {
                EyebrowType::Default => canvas.line(x - 9.0, y, x + 9.0, y, 4.0, INK),
                EyebrowType::RaisedExcited => {
                    canvas.line(x - 9.0, y - 6.0, x + 9.0, y - 8.0, 4.0, INK)
                }
                // inner ends pulled down toward the nose
                EyebrowType::FrownNatural => {
                    canvas.line(x - side * 9.0, y - 3.0, x + side * 9.0, y + 4.0, 4.0, INK)
                }
            }
        }
    }

    fn draw_eyes(&self, canvas: &mut Canvas) {
        let left = CX - EYE_DX;
        let right = CX + EYE_DX;
        match self.eye_type {
            EyeType::Default => {
                canvas.fill_circle(left, EYE_Y, 6.0, INK);
                canvas.fill_circle(right, EYE_Y, 6.0, INK);
            }
            EyeType::Happy => {
                for x in [left, right] {
                    canvas.fill_upper_half_ellipse(x, EYE_Y + 2.0, 8.0, 7.0, INK);
                    canvas.fill_upper_half_ellipse(x, EYE_Y + 2.0, 5.0, 4.0, self.skin_color.rgba());
                }
            }
            EyeType::Surprised => {
                for x in [left, right] {
                    canvas.fill_circle(x, EYE_Y, 11.0, WHITE);
                    canvas.fill_circle(x, EYE_Y, 5.0, INK);
                }
            }
            EyeType::Wink => {
                canvas.fill_circle(left, EYE_Y, 6.0, INK);
                canvas.line(right - 8.0, EYE_Y, right + 8.0, EYE_Y, 4.0, INK);
            }
        }
    }

    fn draw_mouth(&self, canvas: &mut Canvas) {
        let y = HEAD_CY + 30.0;
        match self.mouth_type {
            MouthType::Default => {
                canvas.fill_lower_half_ellipse(CX, y, 14.0, 6.0, INK);
            }
            MouthType::Smile => {
                canvas.fill_lower_half_ellipse(CX, y - 2.0, 20.0, 14.0, INK);
                canvas.fill_rect(CX - 14.0, y - 2.0, 28.0, 4.0, WHITE);
            }
            MouthType::Tongue => {
                canvas.fill_lower_half_ellipse(CX, y - 2.0, 20.0, 16.0, INK);
                canvas.fill_ellipse(CX, y + 9.0, 10.0, 7.0, TONGUE);
            }
            MouthType::Serious => {
                canvas.line(CX - 14.0, y + 2.0, CX + 14.0, y + 2.0, 4.0, INK);
            }
        }
    }

    fn draw_accessories(&self, canvas: &mut Canvas) {
        let left = CX - EYE_DX;
        let right = CX + EYE_DX;
        match self.accessories_type {
            AccessoriesType::Default => {}
            AccessoriesType::Sunglasses => {
                let lens = rgba(0x000000, 220);
                canvas.fill_ellipse(left, EYE_Y + 1.0, 17.0, 13.0, lens);
                canvas.fill_ellipse(right, EYE_Y + 1.0, 17.0, 13.0, lens);
                canvas.line(left + 14.0, EYE_Y - 4.0, right - 14.0, EYE_Y - 4.0, 3.0, lens);
            }
            AccessoriesType::Prescription01 => {
                let frame = rgb(0x3D3D3D);
                canvas.stroke_circle(left, EYE_Y, 16.0, 3.0, frame);
                canvas.stroke_circle(right, EYE_Y, 16.0, 3.0, frame);
                canvas.line(left + 15.0, EYE_Y - 2.0, right - 15.0, EYE_Y - 2.0, 3.0, frame);
            }
        }
    }
}
