//! The state snapshot exposed to presentation surfaces.

use crate::auth::User;
use crate::notifications::{Notification, NotificationPreferences};
use crate::orders::Order;
use crate::pricing;
use crate::suppliers::Supplier;
use crate::tanks::Tank;

/// One consistent view of everything the UI renders from.
///
/// Snapshots are replaced atomically by the controller after each awaited
/// operation; observers never see a partially-updated refresh. Consumers
/// treat a snapshot as read-only and trigger change through controller
/// operations.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Whether a session is currently established
    pub authenticated: bool,

    /// The current user, present exactly when `authenticated` is true
    pub user: Option<User>,

    /// True while the startup session restore is running
    pub loading: bool,

    /// Tanks owned by the current user
    pub tanks: Vec<Tank>,

    /// Id of the tank the dashboard displays
    pub selected_tank: Option<String>,

    pub orders: Vec<Order>,

    pub suppliers: Vec<Supplier>,

    pub notifications: Vec<Notification>,

    pub notification_preferences: NotificationPreferences,

    pub preferred_supplier: Option<String>,

    pub auto_order: bool,

    // Dashboard fields mirrored from the selected tank for convenient
    // display.
    pub tank_capacity: f64,
    pub avg_daily_usage: f64,
    pub low_water_threshold: f64,
    pub current_level: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            authenticated: false,
            user: None,
            loading: false,
            tanks: Vec::new(),
            selected_tank: None,
            orders: Vec::new(),
            suppliers: Vec::new(),
            notifications: Vec::new(),
            notification_preferences: NotificationPreferences::default(),
            preferred_supplier: None,
            auto_order: false,
            tank_capacity: 0.0,
            avg_daily_usage: 0.0,
            low_water_threshold: 20.0,
            current_level: 0.0,
        }
    }
}

impl AppState {
    /// The tank the dashboard is currently displaying
    pub fn selected_tank(&self) -> Option<&Tank> {
        let id = self.selected_tank.as_deref()?;
        self.tanks.iter().find(|tank| tank.id == id)
    }

    /// Orders with a delivery still ahead of them
    pub fn upcoming_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| order.status.is_upcoming())
    }

    /// Orders in a terminal state
    pub fn past_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| order.status.is_past())
    }

    /// Projected whole days of supply left in the selected tank, or `None`
    /// when the usage rate is unknown
    pub fn days_remaining(&self) -> Option<u32> {
        pricing::days_remaining(self.current_level, self.tank_capacity, self.avg_daily_usage)
    }

    /// Point the dashboard mirror at the given tank
    pub(crate) fn mirror_tank(&mut self, tank: &Tank) {
        self.selected_tank = Some(tank.id.clone());
        self.tank_capacity = tank.capacity;
        self.avg_daily_usage = tank.avg_daily_usage;
        self.low_water_threshold = tank.low_water_threshold;
        self.current_level = tank.current_level;
    }
}
