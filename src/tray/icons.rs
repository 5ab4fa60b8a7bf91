//! Tray icon generation.
//!
//! Icons are drawn at runtime into a 32x32 RGBA buffer: a filled disc whose
//! color encodes the [`IconState`], on a transparent background.

use crate::core::IconState;

pub const ICON_SIZE: usize = 32;

fn color(state: IconState) -> [u8; 4] {
    match state {
        IconState::Running => [46, 204, 113, 255],
        IconState::Stopped => [149, 165, 166, 255],
        IconState::NoNetwork => [231, 76, 60, 255],
    }
}

/// Raw RGBA pixels for `state`.
pub fn icon_rgba(state: IconState) -> Vec<u8> {
    let mut rgba = vec![0u8; ICON_SIZE * ICON_SIZE * 4];
    let fill = color(state);
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let outer = ICON_SIZE as f32 / 2.0 - 1.0;
    let inner = outer - 2.0;

    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let px = if dist <= inner {
                fill
            } else if dist <= outer {
                // dark rim keeps the disc visible on light and dark bars
                [0, 0, 0, 160]
            } else {
                continue;
            };
            let idx = (y * ICON_SIZE + x) * 4;
            rgba[idx..idx + 4].copy_from_slice(&px);
        }
    }
    rgba
}

pub fn icon(state: IconState) -> tauri::image::Image<'static> {
    tauri::image::Image::new_owned(icon_rgba(state), ICON_SIZE as u32, ICON_SIZE as u32)
}
