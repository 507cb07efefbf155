use lazy_static::lazy_static;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;

use crate::config::SurveyConfig;
use crate::console_log;
use crate::raster::GeoRaster;

// Module state shared by the JS exports: the published DEM and active config.
//
// The DEM is only ever replaced as a whole `Arc`, so a session that cloned the
// previous reference keeps sampling a consistent raster until it refreshes.
pub struct ModuleState {
    dem: Option<Arc<GeoRaster>>,
    // Bumped on every publish/withdraw
    dem_generation: u64,
    pub config: SurveyConfig,
}

lazy_static! {
    static ref MODULE_STATE: ReentrantMutex<RefCell<ModuleState>> =
        ReentrantMutex::new(RefCell::new(ModuleState::new()));
}

impl Default for ModuleState {
    fn default() -> Self {
        ModuleState::new()
    }
}

impl ModuleState {
    pub fn new() -> Self {
        ModuleState {
            dem: None,
            dem_generation: 0,
            config: SurveyConfig::default(),
        }
    }

    pub fn with_mut<F, R>(f: F) -> R
    where
        F: FnOnce(&mut ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let mut borrow = guard.borrow_mut();
        f(&mut borrow)
    }

    pub fn with<F, R>(f: F) -> R
    where
        F: FnOnce(&ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let borrow = guard.borrow();
        f(&borrow)
    }

    /// Snapshot of the published DEM for the caller to sample against.
    pub fn current_dem() -> Option<Arc<GeoRaster>> {
        Self::with(|state| state.dem_handle())
    }

    pub fn dem_handle(&self) -> Option<Arc<GeoRaster>> {
        self.dem.clone()
    }

    pub fn publish_dem(&mut self, raster: GeoRaster, source: &str) {
        console_log!(
            "DEM published from {} ({}x{}) - 3D measurements enabled",
            source,
            raster.width(),
            raster.height()
        );
        self.dem = Some(Arc::new(raster));
        self.dem_generation += 1;
    }

    pub fn withdraw_dem(&mut self) {
        if self.dem.take().is_some() {
            console_log!("DEM withdrawn - measurements will be 2D only");
        }
        self.dem_generation += 1;
    }

    pub fn dem(&self) -> Option<&GeoRaster> {
        self.dem.as_deref()
    }

    pub fn dem_generation(&self) -> u64 {
        self.dem_generation
    }
}
