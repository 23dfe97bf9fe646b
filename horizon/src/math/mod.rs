mod horizon_angle;

pub(crate) use horizon_angle::horizon_angle;
