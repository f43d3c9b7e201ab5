use ratatui::style::{Color, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    X256,
    X16,
    /// No escape sequences at all (`NO_COLOR`, `GTC_COLOR=none`).
    Plain,
}

/// Detect terminal color depth from environment.
/// Priority: GTC_COLOR override -> NO_COLOR -> COLORTERM truecolor/24bit -> TERM *256color -> 16.
pub fn detect_color_depth() -> ColorDepth {
    if let Ok(force) = std::env::var("GTC_COLOR") {
        match force.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "24-bit" => return ColorDepth::Truecolor,
            "256" | "x256" | "256color" => return ColorDepth::X256,
            "16" | "ansi" | "x16" => return ColorDepth::X16,
            "none" | "off" | "plain" => return ColorDepth::Plain,
            _ => {}
        }
    }

    if std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()) {
        return ColorDepth::Plain;
    }

    if let Ok(colorterm) = std::env::var("COLORTERM") {
        let s = colorterm.to_ascii_lowercase();
        if s.contains("truecolor") || s.contains("24bit") || s.contains("24-bit") {
            return ColorDepth::Truecolor;
        }
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.to_ascii_lowercase().contains("256color") {
            return ColorDepth::X256;
        }
    }
    ColorDepth::X16
}

/// Parse a Twitch-style hex color: `#rgb` or `#rrggbb`, leading `#` optional.
pub fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Map a Color to the nearest representable color in the chosen depth.
pub fn quantize_color(color: Color, depth: ColorDepth) -> Color {
    match depth {
        ColorDepth::Truecolor | ColorDepth::Plain => color,
        ColorDepth::X256 => match color {
            Color::Rgb(r, g, b) => Color::Indexed(rgb_to_xterm256(r, g, b)),
            other => other,
        },
        ColorDepth::X16 => match color {
            Color::Rgb(r, g, b) => nearest_ansi16_from_rgb(r, g, b),
            Color::Indexed(i) => {
                let (r, g, b) = xterm256_to_rgb(i);
                nearest_ansi16_from_rgb(r, g, b)
            }
            other => other,
        },
    }
}

pub fn quantize_style(mut style: Style, depth: ColorDepth) -> Style {
    if let Some(fg) = style.fg {
        style.fg = Some(quantize_color(fg, depth));
    }
    if let Some(bg) = style.bg {
        style.bg = Some(quantize_color(bg, depth));
    }
    style
}

fn nearest_ansi16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    // 0..7 standard, 8..15 bright
    const ANSI16: &[(u8, u8, u8, Color); 16] = &[
        (0, 0, 0, Color::Black),
        (205, 0, 0, Color::Red),
        (0, 205, 0, Color::Green),
        (205, 205, 0, Color::Yellow),
        (0, 0, 205, Color::Blue),
        (205, 0, 205, Color::Magenta),
        (0, 205, 205, Color::Cyan),
        (192, 192, 192, Color::Gray),
        (128, 128, 128, Color::DarkGray),
        (255, 0, 0, Color::LightRed),
        (0, 255, 0, Color::LightGreen),
        (255, 255, 0, Color::LightYellow),
        (92, 92, 255, Color::LightBlue),
        (255, 0, 255, Color::LightMagenta),
        (0, 255, 255, Color::LightCyan),
        (255, 255, 255, Color::White),
    ];

    ANSI16
        .iter()
        .min_by_key(|&&(rr, gg, bb, _)| color_dist_sq((r, g, b), (rr, gg, bb)))
        .map(|entry| entry.3)
        .unwrap_or(Color::White)
}

fn rgb_to_xterm256(r: u8, g: u8, b: u8) -> u8 {
    // Nearest of the 6x6x6 cube and the grayscale ramp.
    fn cube_comp(c: u8) -> u8 {
        match c {
            0..=47 => 0,
            48..=113 => 1,
            _ => ((c - 35) / 40).min(5),
        }
    }
    let cube_index = 16 + 36 * cube_comp(r) + 6 * cube_comp(g) + cube_comp(b);

    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let gray_step = if avg <= 3 { 16 } else { avg.saturating_sub(8) / 10 };
    let gray_index = 232 + (gray_step as u8).min(23);

    let cube_dist = color_dist_sq((r, g, b), xterm256_to_rgb(cube_index));
    let gray_dist = color_dist_sq((r, g, b), xterm256_to_rgb(gray_index));
    if gray_dist < cube_dist {
        gray_index
    } else {
        cube_index
    }
}

fn color_dist_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

pub fn xterm256_to_rgb(i: u8) -> (u8, u8, u8) {
    fn cube_level(i: u8) -> u8 {
        if i == 0 {
            0
        } else {
            55 + 40 * i
        }
    }
    const SYSTEM: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (205, 0, 0),
        (0, 205, 0),
        (205, 205, 0),
        (0, 0, 205),
        (205, 0, 205),
        (0, 205, 205),
        (229, 229, 229),
        (127, 127, 127),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (92, 92, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    match i {
        0..=15 => SYSTEM[i as usize],
        16..=231 => {
            let n = i - 16;
            (cube_level(n / 36), cube_level((n % 36) / 6), cube_level(n % 6))
        }
        232..=255 => {
            let v = 8 + 10 * (i - 232);
            (v, v, v)
        }
    }
}
