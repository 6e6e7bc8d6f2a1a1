// Built-in file mapping strategies
//
// These only move bytes or serde values between the domain object and the
// configured files; they know nothing about any particular tool's format.

use crate::port::{InputMapping, MappingContext, MappingError, MappingFactory, OutputMapping};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Writes the domain object's text verbatim to the input file
pub struct WriteText;

impl<D: AsRef<str> + ?Sized> InputMapping<D, ()> for WriteText {
    fn map_input(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<(), MappingError> {
        ctx.write_input(domain.as_ref())
    }
}

/// Reads the output file as text
pub struct ReadText;

impl<D: ?Sized> OutputMapping<D, String> for ReadText {
    fn map_output(&self, ctx: &MappingContext<'_>, _domain: &D) -> Result<String, MappingError> {
        ctx.read_output()
    }
}

/// Writes the domain object as pretty-printed JSON to the input file
pub struct WriteJson;

impl<D: Serialize + ?Sized> InputMapping<D, ()> for WriteJson {
    fn map_input(&self, ctx: &MappingContext<'_>, domain: &D) -> Result<(), MappingError> {
        let json = serde_json::to_string_pretty(domain)?;
        ctx.write_input(json)
    }
}

/// Parses the output file as JSON
pub struct ReadJson<O>(PhantomData<fn() -> O>);

impl<O> ReadJson<O> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<O> Default for ReadJson<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized, O: DeserializeOwned> OutputMapping<D, O> for ReadJson<O> {
    fn map_output(&self, ctx: &MappingContext<'_>, _domain: &D) -> Result<O, MappingError> {
        let text = ctx.read_output()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Default strategies for tools that consume and produce plain text
pub struct TextFileMappings;

impl<D: AsRef<str> + ?Sized> MappingFactory<D, (), String> for TextFileMappings {
    fn input_mapping(&self) -> Arc<dyn InputMapping<D, ()>> {
        Arc::new(WriteText)
    }

    fn output_mapping(&self) -> Arc<dyn OutputMapping<D, String>> {
        Arc::new(ReadText)
    }
}

/// Default strategies for tools that consume and produce JSON
pub struct JsonFileMappings<O>(PhantomData<fn() -> O>);

impl<O> JsonFileMappings<O> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<O> Default for JsonFileMappings<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, O> MappingFactory<D, (), O> for JsonFileMappings<O>
where
    D: Serialize + ?Sized,
    O: DeserializeOwned + 'static,
{
    fn input_mapping(&self) -> Arc<dyn InputMapping<D, ()>> {
        Arc::new(WriteJson)
    }

    fn output_mapping(&self) -> Arc<dyn OutputMapping<D, O>> {
        Arc::new(ReadJson::<O>::new())
    }
}
