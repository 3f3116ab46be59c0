use crate::paint::Color;
use crate::pixel::{AlphaMode, Bitmap};

/// Composites `tint` source-over every pixel of `bitmap`, honouring its channel
/// order and alpha mode.
pub fn apply_tint(bitmap: &mut Bitmap, tint: Color) {
    let tint = tint.clamped();
    if tint.a <= 0.0 {
        return;
    }
    let [ro, go, bo, ao] = bitmap.format.channel_offsets();
    let alpha = bitmap.alpha;

    for y in 0..bitmap.height() {
        for px in bitmap.pixels.row_mut(y) {
            let raw = px.to_array();
            let rgba = [raw[ro], raw[go], raw[bo], raw[ao]];
            let out = blend(tint, rgba, alpha);
            let mut next = raw;
            next[ro] = out[0];
            next[go] = out[1];
            next[bo] = out[2];
            next[ao] = out[3];
            *px = crate::pixel::Rgba8::from_array(next);
        }
    }
}

fn blend(tint: Color, rgba: [u8; 4], alpha: AlphaMode) -> [u8; 4] {
    match alpha {
        AlphaMode::Premultiplied => tint.over_premul_u8(rgba),
        AlphaMode::Ignored => {
            let mut out = tint.over_premul_u8([rgba[0], rgba[1], rgba[2], 255]);
            out[3] = rgba[3];
            out
        }
        AlphaMode::Straight => {
            let a = rgba[3] as u32;
            let premul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
            let out = tint.over_premul_u8([premul(rgba[0]), premul(rgba[1]), premul(rgba[2]), rgba[3]]);
            let oa = out[3] as u32;
            if oa == 0 {
                return [0, 0, 0, 0];
            }
            let unpremul = |c: u8| ((c as u32 * 255 + oa / 2) / oa).min(255) as u8;
            [unpremul(out[0]), unpremul(out[1]), unpremul(out[2]), out[3]]
        }
    }
}
