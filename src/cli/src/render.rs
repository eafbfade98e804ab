use cube_core::{CubeState, Face};
use itertools::Itertools;
use owo_colors::OwoColorize;

/// The sticker colours of the usual colour scheme: white top, green front.
const fn rgb(face: Face) -> (u8, u8, u8) {
    match face {
        Face::U => (255, 255, 255),
        Face::R => (200, 16, 46),
        Face::F => (0, 155, 72),
        Face::D => (255, 213, 0),
        Face::L => (255, 88, 0),
        Face::B => (0, 70, 173),
    }
}

/// The colour initial used by the plain rendering.
#[must_use]
pub const fn color_letter(face: Face) -> char {
    match face {
        Face::U => 'W',
        Face::R => 'R',
        Face::F => 'G',
        Face::D => 'Y',
        Face::L => 'O',
        Face::B => 'B',
    }
}

fn sticker(face: Face, color: bool) -> String {
    if color {
        let (r, g, b) = rgb(face);
        "  ".on_truecolor(r, g, b).to_string()
    } else {
        format!("{} ", color_letter(face))
    }
}

fn row(cube: &CubeState, face: Face, r: usize, color: bool) -> String {
    let n = cube.size();
    cube.face(face)[r * n..(r + 1) * n]
        .iter()
        .map(|&s| sticker(s, color))
        .join("")
}

/// The unfolded net with U above the L F R B band and D below.
#[must_use]
pub fn render_net(cube: &CubeState, color: bool) -> String {
    let n = cube.size();
    let indent = " ".repeat(2 * n);
    let mut out = String::new();
    for r in 0..n {
        out += &indent;
        out += row(cube, Face::U, r, color).trim_end();
        out.push('\n');
    }
    for r in 0..n {
        let band = [Face::L, Face::F, Face::R, Face::B]
            .into_iter()
            .map(|face| row(cube, face, r, color))
            .join("");
        out += band.trim_end();
        out.push('\n');
    }
    for r in 0..n {
        out += &indent;
        out += row(cube, Face::D, r, color).trim_end();
        out.push('\n');
    }
    out
}

/// A single face as seen from outside the cube.
#[must_use]
pub fn render_face(cube: &CubeState, face: Face, color: bool) -> String {
    (0..cube.size())
        .map(|r| row(cube, face, r, color).trim_end().to_owned() + "\n")
        .collect()
}
