//! String-to-value converters used by style properties.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use tessera_render::{FontHandle, RenderDevice, RenderError};

/// Why a style value could not be converted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Resource(#[from] RenderError),
}

/// Collaborators a converter may need, such as the device fonts are loaded from.
pub struct ConvertContext<'a> {
    pub device: &'a mut dyn RenderDevice,
}

impl<'a> ConvertContext<'a> {
    pub fn new(device: &'a mut dyn RenderDevice) -> Self {
        Self { device }
    }
}

/// Turns a style-sheet string into the value a setter accepts.
pub trait StyleConverter {
    type Output;

    fn convert(&self, value: &str, cx: &mut ConvertContext<'_>) -> Result<Self::Output, ConvertError>;
}

/// Converts through the target type's `FromStr` implementation.
///
/// Covers colors and both alignment enums.
pub struct ParseConverter<T>(PhantomData<fn() -> T>);

impl<T> ParseConverter<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ParseConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StyleConverter for ParseConverter<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Output = T;

    fn convert(&self, value: &str, _cx: &mut ConvertContext<'_>) -> Result<T, ConvertError> {
        value
            .parse::<T>()
            .map_err(|e| ConvertError::Invalid(e.to_string()))
    }
}

/// Passes the value through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl StyleConverter for StringConverter {
    type Output = String;

    fn convert(&self, value: &str, _cx: &mut ConvertContext<'_>) -> Result<String, ConvertError> {
        Ok(value.to_string())
    }
}

/// Loads the named font through the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontConverter;

impl StyleConverter for FontConverter {
    type Output = FontHandle;

    fn convert(&self, value: &str, cx: &mut ConvertContext<'_>) -> Result<FontHandle, ConvertError> {
        let path = value.trim();
        if path.is_empty() {
            return Err(ConvertError::Invalid("font path is empty".to_string()));
        }
        Ok(cx.device.create_font(path)?)
    }
}
