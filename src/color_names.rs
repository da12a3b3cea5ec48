//! X11 color names, as accepted by PDF tooling color pickers
//!
//! Names are upper case without spaces. `GREY` spellings are accepted for
//! every `GRAY` name, `GRAY0`..=`GRAY100` are generated, and the numbered
//! shades `NAME1`..=`NAME4` of the families below follow the X11 scaling of
//! the first shade (255, 238, 205, 139).

use once_cell::sync::Lazy;
use std::collections::HashMap;

const BASE_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("SNOW", (255, 250, 250)),
    ("GHOSTWHITE", (248, 248, 255)),
    ("WHITESMOKE", (245, 245, 245)),
    ("GAINSBORO", (220, 220, 220)),
    ("FLORALWHITE", (255, 250, 240)),
    ("OLDLACE", (253, 245, 230)),
    ("LINEN", (250, 240, 230)),
    ("ANTIQUEWHITE", (250, 235, 215)),
    ("PAPAYAWHIP", (255, 239, 213)),
    ("BLANCHEDALMOND", (255, 235, 205)),
    ("BISQUE", (255, 228, 196)),
    ("PEACHPUFF", (255, 218, 185)),
    ("NAVAJOWHITE", (255, 222, 173)),
    ("MOCCASIN", (255, 228, 181)),
    ("CORNSILK", (255, 248, 220)),
    ("IVORY", (255, 255, 240)),
    ("LEMONCHIFFON", (255, 250, 205)),
    ("SEASHELL", (255, 245, 238)),
    ("HONEYDEW", (240, 255, 240)),
    ("MINTCREAM", (245, 255, 250)),
    ("AZURE", (240, 255, 255)),
    ("ALICEBLUE", (240, 248, 255)),
    ("LAVENDER", (230, 230, 250)),
    ("LAVENDERBLUSH", (255, 240, 245)),
    ("MISTYROSE", (255, 228, 225)),
    ("WHITE", (255, 255, 255)),
    ("BLACK", (0, 0, 0)),
    ("DARKSLATEGRAY", (47, 79, 79)),
    ("DIMGRAY", (105, 105, 105)),
    ("SLATEGRAY", (112, 128, 144)),
    ("LIGHTSLATEGRAY", (119, 136, 153)),
    ("GRAY", (190, 190, 190)),
    ("LIGHTGRAY", (211, 211, 211)),
    ("DARKGRAY", (169, 169, 169)),
    ("MIDNIGHTBLUE", (25, 25, 112)),
    ("NAVY", (0, 0, 128)),
    ("NAVYBLUE", (0, 0, 128)),
    ("CORNFLOWERBLUE", (100, 149, 237)),
    ("DARKSLATEBLUE", (72, 61, 139)),
    ("SLATEBLUE", (106, 90, 205)),
    ("MEDIUMSLATEBLUE", (123, 104, 238)),
    ("LIGHTSLATEBLUE", (132, 112, 255)),
    ("MEDIUMBLUE", (0, 0, 205)),
    ("ROYALBLUE", (65, 105, 225)),
    ("BLUE", (0, 0, 255)),
    ("DODGERBLUE", (30, 144, 255)),
    ("DEEPSKYBLUE", (0, 191, 255)),
    ("SKYBLUE", (135, 206, 235)),
    ("LIGHTSKYBLUE", (135, 206, 250)),
    ("STEELBLUE", (70, 130, 180)),
    ("LIGHTSTEELBLUE", (176, 196, 222)),
    ("LIGHTBLUE", (173, 216, 230)),
    ("POWDERBLUE", (176, 224, 230)),
    ("PALETURQUOISE", (175, 238, 238)),
    ("DARKTURQUOISE", (0, 206, 209)),
    ("MEDIUMTURQUOISE", (72, 209, 204)),
    ("TURQUOISE", (64, 224, 208)),
    ("CYAN", (0, 255, 255)),
    ("LIGHTCYAN", (224, 255, 255)),
    ("CADETBLUE", (95, 158, 160)),
    ("DARKBLUE", (0, 0, 139)),
    ("DARKCYAN", (0, 139, 139)),
    ("MEDIUMAQUAMARINE", (102, 205, 170)),
    ("AQUAMARINE", (127, 255, 212)),
    ("DARKGREEN", (0, 100, 0)),
    ("DARKOLIVEGREEN", (85, 107, 47)),
    ("DARKSEAGREEN", (143, 188, 143)),
    ("SEAGREEN", (46, 139, 87)),
    ("MEDIUMSEAGREEN", (60, 179, 113)),
    ("LIGHTSEAGREEN", (32, 178, 170)),
    ("PALEGREEN", (152, 251, 152)),
    ("SPRINGGREEN", (0, 255, 127)),
    ("LAWNGREEN", (124, 252, 0)),
    ("GREEN", (0, 255, 0)),
    ("CHARTREUSE", (127, 255, 0)),
    ("MEDIUMSPRINGGREEN", (0, 250, 154)),
    ("GREENYELLOW", (173, 255, 47)),
    ("LIMEGREEN", (50, 205, 50)),
    ("YELLOWGREEN", (154, 205, 50)),
    ("FORESTGREEN", (34, 139, 34)),
    ("OLIVEDRAB", (107, 142, 35)),
    ("LIGHTGREEN", (144, 238, 144)),
    ("DARKKHAKI", (189, 183, 107)),
    ("KHAKI", (240, 230, 140)),
    ("PALEGOLDENROD", (238, 232, 170)),
    ("LIGHTGOLDENRODYELLOW", (250, 250, 210)),
    ("LIGHTYELLOW", (255, 255, 224)),
    ("YELLOW", (255, 255, 0)),
    ("GOLD", (255, 215, 0)),
    ("LIGHTGOLDENROD", (238, 221, 130)),
    ("GOLDENROD", (218, 165, 32)),
    ("DARKGOLDENROD", (184, 134, 11)),
    ("ROSYBROWN", (188, 143, 143)),
    ("INDIANRED", (205, 92, 92)),
    ("SADDLEBROWN", (139, 69, 19)),
    ("SIENNA", (160, 82, 45)),
    ("PERU", (205, 133, 63)),
    ("BURLYWOOD", (222, 184, 135)),
    ("BEIGE", (245, 245, 220)),
    ("WHEAT", (245, 222, 179)),
    ("SANDYBROWN", (244, 164, 96)),
    ("TAN", (210, 180, 140)),
    ("CHOCOLATE", (210, 105, 30)),
    ("FIREBRICK", (178, 34, 34)),
    ("BROWN", (165, 42, 42)),
    ("DARKSALMON", (233, 150, 122)),
    ("SALMON", (250, 128, 114)),
    ("LIGHTSALMON", (255, 160, 122)),
    ("ORANGE", (255, 165, 0)),
    ("DARKORANGE", (255, 140, 0)),
    ("CORAL", (255, 127, 80)),
    ("LIGHTCORAL", (240, 128, 128)),
    ("TOMATO", (255, 99, 71)),
    ("ORANGERED", (255, 69, 0)),
    ("RED", (255, 0, 0)),
    ("DARKRED", (139, 0, 0)),
    ("HOTPINK", (255, 105, 180)),
    ("DEEPPINK", (255, 20, 147)),
    ("PINK", (255, 192, 203)),
    ("LIGHTPINK", (255, 182, 193)),
    ("PALEVIOLETRED", (219, 112, 147)),
    ("MAROON", (176, 48, 96)),
    ("MEDIUMVIOLETRED", (199, 21, 133)),
    ("VIOLETRED", (208, 32, 144)),
    ("MAGENTA", (255, 0, 255)),
    ("DARKMAGENTA", (139, 0, 139)),
    ("VIOLET", (238, 130, 238)),
    ("PLUM", (221, 160, 221)),
    ("ORCHID", (218, 112, 214)),
    ("MEDIUMORCHID", (186, 85, 211)),
    ("DARKORCHID", (153, 50, 204)),
    ("DARKVIOLET", (148, 0, 211)),
    ("BLUEVIOLET", (138, 43, 226)),
    ("PURPLE", (160, 32, 240)),
    ("MEDIUMPURPLE", (147, 112, 219)),
    ("THISTLE", (216, 191, 216)),
    ("AQUA", (0, 255, 255)),
    ("FUCHSIA", (255, 0, 255)),
    ("LIME", (0, 255, 0)),
    ("TEAL", (0, 128, 128)),
    ("OLIVE", (128, 128, 0)),
    ("SILVER", (192, 192, 192)),
    ("CRIMSON", (220, 20, 60)),
    ("INDIGO", (75, 0, 130)),
];

/// First numbered shade (`NAME1`) of each family with numbered variants
const SHADE_FAMILIES: &[(&str, (u8, u8, u8))] = &[
    ("SNOW", (255, 250, 250)),
    ("SEASHELL", (255, 245, 238)),
    ("ANTIQUEWHITE", (255, 239, 219)),
    ("BISQUE", (255, 228, 196)),
    ("PEACHPUFF", (255, 218, 185)),
    ("NAVAJOWHITE", (255, 222, 173)),
    ("LEMONCHIFFON", (255, 250, 205)),
    ("CORNSILK", (255, 248, 220)),
    ("IVORY", (255, 255, 240)),
    ("HONEYDEW", (240, 255, 240)),
    ("LAVENDERBLUSH", (255, 240, 245)),
    ("MISTYROSE", (255, 228, 225)),
    ("AZURE", (240, 255, 255)),
    ("SLATEBLUE", (131, 111, 255)),
    ("ROYALBLUE", (72, 118, 255)),
    ("BLUE", (0, 0, 255)),
    ("DODGERBLUE", (30, 144, 255)),
    ("STEELBLUE", (99, 184, 255)),
    ("DEEPSKYBLUE", (0, 191, 255)),
    ("SKYBLUE", (135, 206, 255)),
    ("LIGHTSKYBLUE", (176, 226, 255)),
    ("SLATEGRAY", (198, 226, 255)),
    ("LIGHTSTEELBLUE", (202, 225, 255)),
    ("LIGHTBLUE", (191, 239, 255)),
    ("LIGHTCYAN", (224, 255, 255)),
    ("PALETURQUOISE", (187, 255, 255)),
    ("CADETBLUE", (152, 245, 255)),
    ("TURQUOISE", (0, 245, 255)),
    ("CYAN", (0, 255, 255)),
    ("DARKSLATEGRAY", (151, 255, 255)),
    ("AQUAMARINE", (127, 255, 212)),
    ("DARKSEAGREEN", (193, 255, 193)),
    ("SEAGREEN", (84, 255, 159)),
    ("PALEGREEN", (154, 255, 154)),
    ("SPRINGGREEN", (0, 255, 127)),
    ("GREEN", (0, 255, 0)),
    ("CHARTREUSE", (127, 255, 0)),
    ("OLIVEDRAB", (192, 255, 62)),
    ("DARKOLIVEGREEN", (202, 255, 112)),
    ("KHAKI", (255, 246, 143)),
    ("LIGHTGOLDENROD", (255, 236, 139)),
    ("LIGHTYELLOW", (255, 255, 224)),
    ("YELLOW", (255, 255, 0)),
    ("GOLD", (255, 215, 0)),
    ("GOLDENROD", (255, 193, 37)),
    ("DARKGOLDENROD", (255, 185, 15)),
    ("ROSYBROWN", (255, 193, 193)),
    ("INDIANRED", (255, 106, 106)),
    ("SIENNA", (255, 130, 71)),
    ("BURLYWOOD", (255, 211, 155)),
    ("WHEAT", (255, 231, 186)),
    ("TAN", (255, 165, 79)),
    ("CHOCOLATE", (255, 127, 36)),
    ("FIREBRICK", (255, 48, 48)),
    ("BROWN", (255, 64, 64)),
    ("SALMON", (255, 140, 105)),
    ("LIGHTSALMON", (255, 160, 122)),
    ("ORANGE", (255, 165, 0)),
    ("DARKORANGE", (255, 127, 0)),
    ("CORAL", (255, 114, 86)),
    ("TOMATO", (255, 99, 71)),
    ("ORANGERED", (255, 69, 0)),
    ("RED", (255, 0, 0)),
    ("DEEPPINK", (255, 20, 147)),
    ("HOTPINK", (255, 110, 180)),
    ("PINK", (255, 181, 197)),
    ("LIGHTPINK", (255, 174, 185)),
    ("PALEVIOLETRED", (255, 130, 171)),
    ("MAROON", (255, 52, 179)),
    ("VIOLETRED", (255, 62, 150)),
    ("MAGENTA", (255, 0, 255)),
    ("ORCHID", (255, 131, 250)),
    ("PLUM", (255, 187, 255)),
    ("MEDIUMORCHID", (224, 102, 255)),
    ("DARKORCHID", (191, 62, 255)),
    ("PURPLE", (155, 48, 255)),
    ("MEDIUMPURPLE", (171, 130, 255)),
    ("THISTLE", (255, 225, 255)),
];

const SHADE_SCALES: [u16; 4] = [255, 238, 205, 139];

/// Maps upper-case color names to 8-bit RGB
pub static NAMED_COLORS: Lazy<HashMap<String, (u8, u8, u8)>> = Lazy::new(|| {
    let mut m = HashMap::new();

    for &(name, rgb) in BASE_COLORS {
        m.insert(name.to_string(), rgb);
    }

    for &(name, (r, g, b)) in SHADE_FAMILIES {
        for (i, scale) in SHADE_SCALES.iter().enumerate() {
            let shade = |c: u8| ((c as u16 * scale + 127) / 255) as u8;
            m.insert(format!("{}{}", name, i + 1), (shade(r), shade(g), shade(b)));
        }
    }

    for level in 0..=100u16 {
        let v = ((level * 255 + 50) / 100) as u8;
        m.insert(format!("GRAY{}", level), (v, v, v));
    }

    m
});

/// Look up an X11 color name (already upper-cased)
pub fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    NAMED_COLORS
        .get(&name)
        .or_else(|| NAMED_COLORS.get(&name.replace("GREY", "GRAY")))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_and_uncommon_names() {
        assert_eq!(named_color("RED"), Some((255, 0, 0)));
        assert_eq!(named_color("DARKORANGE"), Some((255, 140, 0)));
        assert_eq!(named_color("LIGHTYELLOW"), Some((255, 255, 224)));
        assert_eq!(named_color("LIGHTPINK"), Some((255, 182, 193)));
        assert_eq!(named_color("PAPAYAWHIP"), Some((255, 239, 213)));
        assert_eq!(named_color("NOTACOLOR"), None);
    }

    #[test]
    fn test_numbered_shades() {
        assert_eq!(named_color("ORANGE1"), Some((255, 165, 0)));
        assert_eq!(named_color("ORANGE2"), Some((238, 154, 0)));
        assert_eq!(named_color("ORANGE3"), Some((205, 133, 0)));
        assert_eq!(named_color("ORANGE4"), Some((139, 90, 0)));
        assert_eq!(named_color("ORANGE5"), None);
    }

    #[test]
    fn test_gray_levels_and_grey_spelling() {
        assert_eq!(named_color("GRAY0"), Some((0, 0, 0)));
        assert_eq!(named_color("GRAY100"), Some((255, 255, 255)));
        assert_eq!(named_color("GRAY1"), Some((3, 3, 3)));
        assert_eq!(named_color("DARKSLATEGREY"), named_color("DARKSLATEGRAY"));
        assert_eq!(named_color("GREY42"), named_color("GRAY42"));
        assert_eq!(named_color("LIGHT GRAY"), Some((211, 211, 211)));
    }
}
