//! Option contract definitions
//!
//! `OptionParameters` is the validated input to the pricing kernel. Values are
//! checked once at construction and never change afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{BsmError, BsmResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = BsmError;

    /// Accepts `C`, `c`, `Call`, `P`, `p` and `Put`.
    fn from_str(s: &str) -> BsmResult<Self> {
        match s {
            "C" | "c" | "Call" => Ok(OptionType::Call),
            "P" | "p" | "Put" => Ok(OptionType::Put),
            other => Err(BsmError::invalid_parameter(format!(
                "option_type must be one of C, c, Call, P, p, Put, got '{}'",
                other
            ))),
        }
    }
}

/// Validated Black-Scholes-Merton inputs for a single European option.
///
/// Zero `volatility` or zero `time_to_expiry` are accepted: the kernel prices
/// them with the intrinsic limit instead of the closed form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionParameters {
    spot_price: f64,
    strike_price: f64,
    time_to_expiry: f64,
    risk_free_rate: f64,
    volatility: f64,
    option_type: OptionType,
    dividend_yield: f64,
}

impl OptionParameters {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    /// `BsmError::InvalidParameter` when spot or strike is not strictly
    /// positive, when time, volatility or dividend yield is negative, or when
    /// any value is NaN or infinite.
    pub fn new(
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
        dividend_yield: f64,
    ) -> BsmResult<Self> {
        require_finite("spot_price", spot_price)?;
        require_finite("strike_price", strike_price)?;
        require_finite("time_to_expiry", time_to_expiry)?;
        require_finite("risk_free_rate", risk_free_rate)?;
        require_finite("volatility", volatility)?;
        require_finite("dividend_yield", dividend_yield)?;

        if spot_price <= 0.0 {
            return Err(BsmError::invalid_parameter(format!(
                "spot_price must be positive, got {}",
                spot_price
            )));
        }
        if strike_price <= 0.0 {
            return Err(BsmError::invalid_parameter(format!(
                "strike_price must be positive, got {}",
                strike_price
            )));
        }
        if time_to_expiry < 0.0 {
            return Err(BsmError::invalid_parameter(format!(
                "time_to_expiry must be non-negative, got {}",
                time_to_expiry
            )));
        }
        if volatility < 0.0 {
            return Err(BsmError::invalid_parameter(format!(
                "volatility must be non-negative, got {}",
                volatility
            )));
        }
        if dividend_yield < 0.0 {
            return Err(BsmError::invalid_parameter(format!(
                "dividend_yield must be non-negative, got {}",
                dividend_yield
            )));
        }

        Ok(Self {
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            volatility,
            option_type,
            dividend_yield,
        })
    }

    /// European call with the given inputs
    pub fn call(
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        dividend_yield: f64,
    ) -> BsmResult<Self> {
        Self::new(
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            volatility,
            OptionType::Call,
            dividend_yield,
        )
    }

    /// European put with the given inputs
    pub fn put(
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        dividend_yield: f64,
    ) -> BsmResult<Self> {
        Self::new(
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            volatility,
            OptionType::Put,
            dividend_yield,
        )
    }

    pub fn spot_price(&self) -> f64 {
        self.spot_price
    }

    pub fn strike_price(&self) -> f64 {
        self.strike_price
    }

    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Same contract with the opposite option type (for parity checks)
    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..*self
        }
    }

    /// Same contract at a different spot, revalidated
    pub fn with_spot(&self, spot_price: f64) -> BsmResult<Self> {
        Self::new(
            spot_price,
            self.strike_price,
            self.time_to_expiry,
            self.risk_free_rate,
            self.volatility,
            self.option_type,
            self.dividend_yield,
        )
    }

    /// Same contract at a different volatility, revalidated
    pub fn with_volatility(&self, volatility: f64) -> BsmResult<Self> {
        Self::new(
            self.spot_price,
            self.strike_price,
            self.time_to_expiry,
            self.risk_free_rate,
            volatility,
            self.option_type,
            self.dividend_yield,
        )
    }

    /// Same contract at a different time to expiry, revalidated
    pub fn with_time_to_expiry(&self, time_to_expiry: f64) -> BsmResult<Self> {
        Self::new(
            self.spot_price,
            self.strike_price,
            time_to_expiry,
            self.risk_free_rate,
            self.volatility,
            self.option_type,
            self.dividend_yield,
        )
    }

    /// Total standard deviation of log returns to expiry: vol * sqrt(T)
    pub fn std_dev(&self) -> f64 {
        self.volatility * self.time_to_expiry.sqrt()
    }

    /// True when the closed form is undefined: vol * sqrt(T) is zero,
    /// including when the product underflows
    pub fn is_degenerate(&self) -> bool {
        self.std_dev() == 0.0
    }

    /// Spot discounted by the dividend yield: S * exp(-qT)
    pub fn discounted_spot(&self) -> f64 {
        self.spot_price * (-self.dividend_yield * self.time_to_expiry).exp()
    }

    /// Strike discounted at the risk-free rate: K * exp(-rT)
    pub fn discounted_strike(&self) -> f64 {
        self.strike_price * (-self.risk_free_rate * self.time_to_expiry).exp()
    }
}

fn require_finite(name: &str, value: f64) -> BsmResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BsmError::invalid_parameter(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}
