pub type CsVec = sprs::CsVecI<f64, usize>;
