// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme values consumed by the list.

/// An 8-bit-per-channel RGBA colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Read-only theme provider.
///
/// The list reads these values on every reconciliation pass, so a host may
/// swap theme values at runtime and simply call `refresh`.
pub trait Theme {
    /// Space between consecutive rows. Separators are drawn centered in it.
    fn padding(&self) -> f64;

    /// Thickness of the separator line drawn between rows.
    fn separator_thickness(&self) -> f64;

    /// Row background while hovered or focused.
    fn hover_color(&self) -> Color;

    /// Row background while selected.
    fn selection_color(&self) -> Color;
}

/// Fixed theme values suitable for tests and simple hosts.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultTheme {
    /// See [`Theme::padding`].
    pub padding: f64,
    /// See [`Theme::separator_thickness`].
    pub separator_thickness: f64,
    /// See [`Theme::hover_color`].
    pub hover: Color,
    /// See [`Theme::selection_color`].
    pub selection: Color,
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self {
            padding: 4.0,
            separator_thickness: 1.0,
            hover: Color::rgba(0xff, 0xff, 0xff, 0x0f),
            selection: Color::rgba(0x00, 0x6c, 0xff, 0x3f),
        }
    }
}

impl Theme for DefaultTheme {
    fn padding(&self) -> f64 {
        self.padding
    }

    fn separator_thickness(&self) -> f64 {
        self.separator_thickness
    }

    fn hover_color(&self) -> Color {
        self.hover
    }

    fn selection_color(&self) -> Color {
        self.selection
    }
}
