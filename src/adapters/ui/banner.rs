//! Gradient ASCII banner (COURSES) printed at startup.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Deep Blue (#1e3a8a).
const DEEP_BLUE: (u8, u8, u8) = (0x1e, 0x3a, 0x8a);
/// Violet (#7c3aed).
const VIOLET: (u8, u8, u8) = (0x7c, 0x3a, 0xed);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints "COURSES" in the standard figlet font with a blue-to-violet gradient, then the
/// version. Falls back to plain text if the font cannot be loaded.
pub fn print_welcome() {
    let mut out = stdout();
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("COURSES").map(|f| f.to_string()))
        .unwrap_or_else(|| "COURSES".to_string());
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(DEEP_BLUE, VIOLET, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: VIOLET.0,
        g: VIOLET.1,
        b: VIOLET.2,
    }));
    let _ = out.execute(Print(format!("v{}\r\n", version)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
