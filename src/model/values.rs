#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    pub fn from_val(val: &str) -> Self {
        match val {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            "both" => Alignment::Justify,
            "distribute" => Alignment::Distribute,
            _ => Alignment::Left,
        }
    }

    pub fn as_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
            Alignment::Distribute => "distribute",
        }
    }
}

/// A color as written in the source: a normalized 6-digit hex literal
/// and/or a theme reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorValue {
    pub rgb: Option<String>,
    pub theme_color: Option<String>,
    pub theme_tint: Option<String>,
    pub theme_shade: Option<String>,
}

impl ColorValue {
    pub fn rgb(hex: &str) -> Self {
        Self {
            rgb: Some(hex.to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_none() && self.theme_color.is_none()
    }

    pub fn to_rgb_bytes(&self) -> Option<[u8; 3]> {
        let hex = self.rgb.as_deref()?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some([r, g, b])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub style: String,
    pub width_pt: f32, // w:sz is in eighths of a point
    pub space_pt: f32,
    pub color: Option<ColorValue>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Borders {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
    pub inside_h: Option<Border>,
    pub inside_v: Option<Border>,
    pub between: Option<Border>,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
            && self.bottom.is_none()
            && self.left.is_none()
            && self.right.is_none()
            && self.inside_h.is_none()
            && self.inside_v.is_none()
            && self.between.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shading {
    pub pattern: Option<String>,
    pub fill: Option<ColorValue>,
    pub color: Option<ColorValue>,
}

/// Margins in points; `None` means "inherit".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Width {
    Auto,
    Nil,
    Points(f32),
    /// Percentage of the available width (0-100).
    Percent(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TabAlignment {
    Left,
    Center,
    Right,
    Decimal,
    Bar,
    Num,
    Clear,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TabStop {
    pub position: f32,
    pub alignment: TabAlignment,
    pub leader: Option<char>,
}
