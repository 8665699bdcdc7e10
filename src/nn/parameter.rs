//! Trainable parameter storage

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// A trainable tensor: flat data, accumulated gradient and logical shape
#[derive(Debug, Clone)]
pub struct Parameter {
    data: Array1<f32>,
    grad: Array1<f32>,
    shape: Vec<usize>,
}

impl Parameter {
    /// Create a parameter from flat data and its logical shape
    pub fn new(shape: &[usize], data: Array1<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::Shape(format!(
                "parameter of shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        let grad = Array1::zeros(data.len());
        Ok(Self { data, grad, shape: shape.to_vec() })
    }

    /// Trusted constructor for layer code that sized `data` from `shape`
    pub(crate) fn from_parts(shape: &[usize], data: Array1<f32>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        let grad = Array1::zeros(data.len());
        Self { data, grad, shape: shape.to_vec() }
    }

    /// Zero-initialised parameter
    pub fn zeros(shape: &[usize]) -> Self {
        let len: usize = shape.iter().product();
        Self { data: Array1::zeros(len), grad: Array1::zeros(len), shape: shape.to_vec() }
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    pub fn grad(&self) -> &Array1<f32> {
        &self.grad
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of scalar values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Add `grad` to the accumulated gradient
    pub fn accumulate_grad(&mut self, grad: ArrayView1<'_, f32>) -> Result<()> {
        if grad.len() != self.grad.len() {
            return Err(Error::Computation(format!(
                "gradient of length {} for parameter of length {}",
                grad.len(),
                self.grad.len()
            )));
        }
        self.grad += &grad;
        Ok(())
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// Overwrite the values, keeping the shape
    pub fn assign(&mut self, values: ArrayView1<'_, f32>) -> Result<()> {
        if values.len() != self.data.len() {
            return Err(Error::Shape(format!(
                "cannot assign {} values to parameter of shape {:?}",
                values.len(),
                self.shape
            )));
        }
        self.data.assign(&values);
        Ok(())
    }

    /// Clamp every value into `[min, max]`
    pub fn clamp(&mut self, min: f32, max: f32) {
        self.data.mapv_inplace(|v| v.clamp(min, max));
    }

    /// Matrix view of a 2-D parameter
    pub fn matrix(&self) -> Result<ArrayView2<'_, f32>> {
        match self.shape.as_slice() {
            &[rows, cols] => Ok(self.data.view().into_shape_with_order((rows, cols))?),
            other => Err(Error::Computation(format!("parameter of shape {other:?} is not a matrix"))),
        }
    }
}

/// Owned copy of parameter values (one layer or a whole network), in parameter order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub tensors: Vec<Array1<f32>>,
}

impl Weights {
    pub fn new(tensors: Vec<Array1<f32>>) -> Self {
        Self { tensors }
    }

    /// Copy the current values of `params`
    pub fn capture(params: &[&Parameter]) -> Self {
        Self { tensors: params.iter().map(|p| p.data().clone()).collect() }
    }

    /// Write these values into `params`, validating count and lengths first
    pub fn inject(&self, params: &mut [&mut Parameter]) -> Result<()> {
        if params.len() != self.tensors.len() {
            return Err(Error::Shape(format!(
                "{} weight tensors for {} parameters",
                self.tensors.len(),
                params.len()
            )));
        }
        for (param, values) in params.iter().zip(&self.tensors) {
            if param.len() != values.len() {
                return Err(Error::Shape(format!(
                    "weight tensor of length {} for parameter of shape {:?}",
                    values.len(),
                    param.shape()
                )));
            }
        }
        for (param, values) in params.iter_mut().zip(&self.tensors) {
            param.assign(values.view())?;
            param.zero_grad();
        }
        Ok(())
    }

    pub fn num_values(&self) -> usize {
        self.tensors.iter().map(Array1::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_parameter_new_checks_length() {
        assert!(Parameter::new(&[2, 3], Array1::zeros(6)).is_ok());
        assert!(matches!(Parameter::new(&[2, 3], Array1::zeros(5)), Err(Error::Shape(_))));
    }

    #[test]
    fn test_accumulate_and_zero_grad() {
        let mut p = Parameter::zeros(&[3]);
        p.accumulate_grad(arr1(&[1.0, 2.0, 3.0]).view()).unwrap();
        p.accumulate_grad(arr1(&[1.0, 1.0, 1.0]).view()).unwrap();
        assert_eq!(p.grad(), &arr1(&[2.0, 3.0, 4.0]));

        p.zero_grad();
        assert!(p.grad().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_accumulate_wrong_length() {
        let mut p = Parameter::zeros(&[3]);
        assert!(p.accumulate_grad(arr1(&[1.0]).view()).is_err());
    }

    #[test]
    fn test_matrix_view() {
        let p = Parameter::new(&[2, 2], arr1(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let m = p.matrix().unwrap();
        assert_eq!(m[[1, 0]], 3.0);

        let v = Parameter::zeros(&[4]);
        assert!(v.matrix().is_err());
    }

    #[test]
    fn test_layer_weights_roundtrip_is_independent() {
        let mut p = Parameter::new(&[2], arr1(&[1.0, 2.0])).unwrap();
        let snapshot = Weights::capture(&[&p]);

        p.data_mut()[0] = 10.0;
        assert_eq!(snapshot.tensors[0][0], 1.0);

        snapshot.inject(&mut [&mut p]).unwrap();
        assert_eq!(p.data(), &arr1(&[1.0, 2.0]));
    }

    #[test]
    fn test_layer_weights_inject_rejects_mismatch() {
        let mut p = Parameter::zeros(&[3]);
        let weights = Weights::new(vec![arr1(&[1.0, 2.0])]);
        assert!(matches!(weights.inject(&mut [&mut p]), Err(Error::Shape(_))));

        let weights = Weights::new(vec![]);
        assert!(weights.inject(&mut [&mut p]).is_err());
    }
}
