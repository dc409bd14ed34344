// Index layout of the detector's face mesh (468 points) and hand model
// (21 points). These numbers are fixed by the detector.

pub mod face {
    pub const NOSE_TIP: usize = 1;
    pub const NOSE_BRIDGE: usize = 168;
    pub const FOREHEAD: usize = 10;
    pub const CHIN: usize = 152;
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_CHEEK: usize = 454;

    pub const UPPER_LIP_CENTER: usize = 13;
    pub const LOWER_LIP_CENTER: usize = 14;
    pub const LEFT_MOUTH_CORNER: usize = 78;
    pub const RIGHT_MOUTH_CORNER: usize = 308;

    pub const MESH_POINTS: usize = 468;

    /// Inner lip contour ordered so consecutive entries alternate between the
    /// upper and the lower lip, starting and ending at the mouth corners.
    pub const INNER_LIPS_RING: [usize; 20] = [
        LEFT_MOUTH_CORNER,
        191,
        95,
        80,
        88,
        81,
        178,
        82,
        87,
        UPPER_LIP_CENTER,
        LOWER_LIP_CENTER,
        312,
        317,
        311,
        402,
        310,
        318,
        415,
        324,
        RIGHT_MOUTH_CORNER,
    ];
}

pub mod hand {
    pub const WRIST: usize = 0;
    pub const MIDDLE_FINGER_TIP: usize = 12;

    pub const POINTS: usize = 21;
}
