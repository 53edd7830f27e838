use crate::config_error::ConfigError;
use crate::config_structs::global_params_struct::GlobalParameters;

/// Editor operations over the global privacy parameters.
///
/// Every setter replaces a single field. A value outside the field's domain is
/// rejected and the record is left untouched. No relation between fields is
/// enforced, so `l` may exceed `k`.
impl GlobalParameters {
    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn l(&self) -> u32 {
        self.l
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_k(&mut self, k: u32) -> Result<(), ConfigError> {
        if k < 2 {
            return Err(ConfigError::out_of_range("k", ">= 2", k));
        }
        self.k = k;
        Ok(())
    }

    pub fn set_l(&mut self, l: u32) -> Result<(), ConfigError> {
        if l < 2 {
            return Err(ConfigError::out_of_range("l", ">= 2", l));
        }
        self.l = l;
        Ok(())
    }

    pub fn set_t(&mut self, t: f64) -> Result<(), ConfigError> {
        // NaN fails both comparisons and is rejected too.
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::out_of_range("t", "(0.0, 1.0]", t));
        }
        self.t = t;
        Ok(())
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<(), ConfigError> {
        if !(epsilon >= 0.1 && epsilon.is_finite()) {
            return Err(ConfigError::out_of_range("epsilon", ">= 0.1", epsilon));
        }
        self.epsilon = epsilon;
        Ok(())
    }
}
