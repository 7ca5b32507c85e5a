//! Uncertain input parameters
//!
//! A [`Parameter`] binds a unique name and description to a density, plus
//! optional calibration metadata. Its `values` column holds the points the
//! active sampling strategy has generated so far; strategies only ever
//! append to it, so earlier model evaluations stay valid across
//! extensions.

use serde::{Deserialize, Serialize};

use crate::config::PdfConfig;
use crate::error::PdfError;
use crate::pdf::Pdf;

/// Which named family a parameter was constructed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Normal,
    Uniform,
    Weibull,
    Rayleigh,
    Exponential,
    Triangle,
    /// Built from a caller-supplied density
    Custom,
    /// Built from measured data
    Discrete,
}

/// Calibration tag carried through the result store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalType {
    #[serde(rename = "S")]
    Stochastic,
    #[serde(rename = "D")]
    Deterministic,
}

/// A named uncertain input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub kind: ParameterKind,
    pub pdf: Pdf,
    /// Points generated by the sampling strategy, one per model run
    #[serde(default)]
    pub values: Vec<f64>,
    /// Raw observations backing a discrete/calibration parameter
    #[serde(default)]
    pub caldata: Option<Vec<f64>>,
    #[serde(default)]
    pub caltype: Option<CalType>,
}

impl Parameter {
    fn from_pdf(name: &str, description: &str, kind: ParameterKind, pdf: Pdf) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            pdf,
            values: Vec::new(),
            caldata: None,
            caltype: None,
        }
    }

    pub fn normal(name: &str, description: &str, mean: f64, dev: f64) -> Result<Self, PdfError> {
        let pdf = Pdf::normal(mean, dev, PdfConfig::default())?;
        Ok(Self::from_pdf(name, description, ParameterKind::Normal, pdf))
    }

    pub fn uniform(name: &str, description: &str, min: f64, max: f64) -> Result<Self, PdfError> {
        let pdf = Pdf::uniform(Some(min), Some(max), None, PdfConfig::default())?;
        Ok(Self::from_pdf(
            name,
            description,
            ParameterKind::Uniform,
            pdf,
        ))
    }

    pub fn weibull(
        name: &str,
        description: &str,
        shape: f64,
        scale: f64,
    ) -> Result<Self, PdfError> {
        let pdf = Pdf::weibull(shape, scale, PdfConfig::default())?;
        Ok(Self::from_pdf(
            name,
            description,
            ParameterKind::Weibull,
            pdf,
        ))
    }

    pub fn rayleigh(name: &str, description: &str, scale: f64) -> Result<Self, PdfError> {
        let pdf = Pdf::rayleigh(scale, PdfConfig::default())?;
        Ok(Self::from_pdf(
            name,
            description,
            ParameterKind::Rayleigh,
            pdf,
        ))
    }

    pub fn exponential(name: &str, description: &str, rate: f64) -> Result<Self, PdfError> {
        let pdf = Pdf::exponential(rate, PdfConfig::default())?;
        Ok(Self::from_pdf(
            name,
            description,
            ParameterKind::Exponential,
            pdf,
        ))
    }

    pub fn triangle(
        name: &str,
        description: &str,
        min: f64,
        mode: f64,
        max: f64,
    ) -> Result<Self, PdfError> {
        let pdf = Pdf::triangle(min, mode, max, PdfConfig::default())?;
        Ok(Self::from_pdf(
            name,
            description,
            ParameterKind::Triangle,
            pdf,
        ))
    }

    /// Wrap an already-built density; use this to control [`PdfConfig`]
    #[must_use]
    pub fn custom(name: &str, description: &str, pdf: Pdf) -> Self {
        Self::from_pdf(name, description, ParameterKind::Custom, pdf)
    }

    /// Build a parameter from measured observations (histogram density);
    /// the observations are retained as `caldata`
    pub fn discrete(name: &str, description: &str, data: &[f64]) -> Result<Self, PdfError> {
        let pdf = Pdf::experimental(data, 0, PdfConfig::default())?;
        let mut p = Self::from_pdf(name, description, ParameterKind::Discrete, pdf);
        p.caldata = Some(data.to_vec());
        Ok(p)
    }

    #[must_use]
    pub fn with_caldata(mut self, data: Vec<f64>) -> Self {
        self.caldata = Some(data);
        self
    }

    #[must_use]
    pub fn with_caltype(mut self, caltype: CalType) -> Self {
        self.caltype = Some(caltype);
        self
    }
}
