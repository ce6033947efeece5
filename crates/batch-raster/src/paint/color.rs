/// Packed 32-bit color, laid out as `0xAARRGGBB`.
///
/// The engine never blends, so the alpha channel is carried through untouched;
/// it only matters to whoever presents or encodes the surface.
pub type Argb = u32;

/// Alpha bits of a fully opaque color.
pub const OPAQUE_ALPHA: Argb = 0xFF00_0000;

pub const TRANSPARENT: Argb = 0x0000_0000;
pub const BLACK: Argb = 0xFF00_0000;
pub const WHITE: Argb = 0xFFFF_FFFF;
pub const RED: Argb = 0xFFFF_0000;
pub const GREEN: Argb = 0xFF00_FF00;
pub const BLUE: Argb = 0xFF00_00FF;

/// Packs straight 8-bit channels into `0xAARRGGBB`.
#[inline]
pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> Argb {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Packs an opaque color from RGB channels.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Argb {
    pack(0xFF, r, g, b)
}

/// Splits a packed color into `(a, r, g, b)`.
#[inline]
pub const fn unpack(color: Argb) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Forces the alpha channel to 0xFF, keeping RGB.
#[inline]
pub const fn opaque(color: Argb) -> Argb {
    color | OPAQUE_ALPHA
}
