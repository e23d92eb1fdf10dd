use super::Matrix;
use crate::error::Result;

impl Matrix {
    /// Transpose: `dst[j][i] = src[i][j]`.
    ///
    /// After transpose, what was column j becomes row j.
    ///
    /// ```
    /// use tiled_matmul::Matrix;
    ///
    /// let m = Matrix::from_vec(2, vec![1, 2,
    ///                                  3, 4]).unwrap();
    /// let t = m.transpose().unwrap();
    ///
    /// assert_eq!(t.as_slice(), &[1, 3,
    ///                            2, 4]);
    /// ```
    pub fn transpose(&self) -> Result<Matrix> {
        let n = self.dim();
        let mut dst = Matrix::zeros(n)?;
        let src = self.as_slice();
        let out = dst.as_mut_slice();
        for i in 0..n {
            for j in 0..n {
                out[j * n + i] = src[i * n + j];
            }
        }
        Ok(dst)
    }
}
