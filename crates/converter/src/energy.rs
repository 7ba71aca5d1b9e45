//! DDR energy estimation.
//!
//! A standalone estimate of the energy consumed by one converted copy
//! window on each supply rail, combining background (precharged and
//! active), read/write burst, activate/precharge, and RowClone components
//! over fixed DDR timing constants. The model is an external collaborator
//! of the converter: it never feeds back into the conversion decision.

/// Row-active time in cycles.
const T_RAS: f64 = 68.0;
/// Precharge time in cycles.
const T_RP: f64 = 29.0;
/// Row-to-column delay in cycles.
const T_RCD: f64 = 29.0;
/// Column-to-column delay in cycles.
const T_CCD: f64 = 8.0;
/// Read-to-precharge delay in cycles.
const T_RTP: f64 = 12.0;
/// Write latency in cycles.
const T_WL: f64 = 14.0;
/// Write recovery time in cycles.
const T_WR: f64 = 30.0;
/// Burst length in beats.
const BURST_LEN: f64 = 8.0;
/// Clock period in nanoseconds.
const T_CK: f64 = 0.625;
/// RowClone current scaling relative to a normal activate/precharge.
const RHO: f64 = 42.5 / 41.07;
/// Cache lines per row in the modeled window.
const LINES: f64 = 64.0;

/// One supply rail's current profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rail {
    /// Supply voltage in volts.
    pub vdd: f64,
    /// Activate/precharge current.
    pub idd0: f64,
    /// Precharged-standby current.
    pub idd2n: f64,
    /// Active-standby current.
    pub idd3n: f64,
    /// Read burst current.
    pub idd4r: f64,
    /// Write burst current.
    pub idd4w: f64,
}

/// The two DDR supply rails (VDD1 = 1.8 V, VDD2 = 1.1 V).
pub const RAILS: [Rail; 2] = [
    Rail {
        vdd: 1.8,
        idd0: 10.0,
        idd2n: 3.0,
        idd3n: 3.0,
        idd4r: 8.5,
        idd4w: 3.0,
    },
    Rail {
        vdd: 1.1,
        idd0: 65.0,
        idd2n: 26.5,
        idd3n: 32.0,
        idd4r: 420.0,
        idd4w: 435.0,
    },
];

/// Estimates the per-rail energy of one converted copy window.
///
/// Returns one total per entry of [`RAILS`], in the same order.
pub fn estimate() -> [f64; 2] {
    let bg_pre_cycles =
        (T_RCD + LINES * T_CCD + T_RTP) * 2.0 + T_RCD + LINES * T_CCD + T_WL + T_WR + BURST_LEN
            + 2.0;
    let bg_act_cycles = (T_RCD + LINES * T_CCD + 2.0 * T_RTP) * 2.0
        + T_RCD
        + LINES * T_CCD
        + T_WL
        + T_WR
        + BURST_LEN
        + 2.0
        + T_RP;

    let mut totals = [0.0; 2];
    for (total, rail) in totals.iter_mut().zip(RAILS.iter()) {
        let e_bg_pre = rail.vdd * rail.idd2n * bg_pre_cycles;
        let e_bg_act = rail.idd3n * rail.vdd * bg_act_cycles;
        let e_read = rail.vdd * (rail.idd4r - rail.idd3n) * BURST_LEN * T_CK * LINES * 2.0;
        let e_write = rail.vdd * (rail.idd4w - rail.idd3n) * BURST_LEN * T_CK * LINES;
        let e_act_pre =
            rail.idd0 * (T_RAS + T_RP) - rail.idd2n * T_RP - rail.idd3n * T_RAS * 3.0;
        let e_row_clone = e_act_pre * RHO * (2.0 * T_RAS + T_RP);
        *total = e_bg_pre + e_bg_act + e_read + e_write + e_act_pre + e_row_clone;
    }
    totals
}
