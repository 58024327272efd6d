//! The session/data controller: the single owner of authentication state
//! and every dependent domain collection.
//!
//! All reads and writes between the UI and the remote API go through this
//! type. It exposes its state as [`AppState`] snapshots over a
//! `tokio::sync::watch` channel: `snapshot()` for one-off reads,
//! `subscribe()` for observers that re-render on change. State is mutated
//! only here, only after an awaited operation resolves, so a refresh
//! replaces the snapshot atomically.
//!
//! Concurrency model: one re-entrancy-guarded fan-out load at a time, with
//! a fresh one-shot cancel handle per cycle. Logout signals the handle;
//! sub-fetches racing the token resolve as cancelled and are swallowed
//! silently.

mod state;

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::auth::{
    is_valid_email, AuthApi, LoginCredentials, Session, SessionStore, User,
};
use crate::cancel::{cancel_pair, CancelHandle};
use crate::error::Error;
use crate::notifications::{NewNotification, NotificationPreferences, NotificationsApi};
use crate::orders::{NewOrder, Order, OrdersApi};
use crate::suppliers::SuppliersApi;
use crate::tanks::{TankSettings, TanksApi};
use crate::users::{PasswordChange, UserProfile, UsersApi};

pub use state::AppState;

/// Owns the session and all dependent collections, and mediates every
/// exchange between the presentation layer and the AquaFlow API.
pub struct SessionDataController {
    auth: AuthApi,
    tanks: TanksApi,
    orders: OrdersApi,
    suppliers: SuppliersApi,
    notifications: NotificationsApi,
    users: UsersApi,

    store: Arc<dyn SessionStore>,
    persist_session: bool,

    state: watch::Sender<AppState>,
    token: RwLock<Option<String>>,

    /// Re-entrancy guard: at most one fan-out load is in flight; a second
    /// call while one is active is dropped, not queued.
    loading_user_data: AtomicBool,

    /// Cancel handle for the active load cycle, replaced each cycle
    load_cancel: Mutex<Option<CancelHandle>>,

    /// Self-reference for background refreshes spawned by operations
    weak: Weak<SessionDataController>,
}

impl SessionDataController {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        auth: AuthApi,
        tanks: TanksApi,
        orders: OrdersApi,
        suppliers: SuppliersApi,
        notifications: NotificationsApi,
        users: UsersApi,
        store: Arc<dyn SessionStore>,
        persist_session: bool,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(AppState::default());
        Arc::new_cyclic(|weak| Self {
            auth,
            tanks,
            orders,
            suppliers,
            notifications,
            users,
            store,
            persist_session,
            state,
            token: RwLock::new(None),
            loading_user_data: AtomicBool::new(false),
            load_cancel: Mutex::new(None),
            weak: weak.clone(),
        })
    }

    /// A clone of the current state snapshot
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes; each send is one atomic snapshot
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    fn require_token(&self) -> Result<String, Error> {
        self.token
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Unauthorized("not logged in".to_string()))
    }

    /// Restore a persisted session at process start.
    ///
    /// Never fails: an unreadable or absent session degrades to the
    /// unauthenticated state, and no network call is made in that case.
    /// The `loading` flag is cleared on every path.
    pub async fn restore_session(&self) {
        self.state.send_modify(|s| s.loading = true);

        match self.store.load().await {
            Ok(Some(session)) => {
                debug!(user = %session.user.id, "restored persisted session");
                *self.token.write().unwrap() = Some(session.token.clone());
                self.state.send_modify(|s| {
                    s.authenticated = true;
                    s.user = Some(session.user);
                });
                if let Err(err) = self.load_user_data().await {
                    error!(error = %err, "initial data load failed");
                }
            }
            Ok(None) => {
                debug!("no persisted session");
                self.state.send_modify(|s| {
                    s.authenticated = false;
                    s.user = None;
                });
            }
            Err(err) => {
                warn!(error = %err, "session restore failed; treating as signed out");
                self.state.send_modify(|s| {
                    s.authenticated = false;
                    s.user = None;
                });
            }
        }

        self.state.send_modify(|s| s.loading = false);
    }

    /// Log in with email and password.
    ///
    /// Validation runs before any network call; session state is mutated
    /// strictly after the server accepts the credentials (no optimistic
    /// login), and a failed call leaves state untouched. No retry.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(Error::validation("email and password are required"));
        }
        if !is_valid_email(credentials.email.trim()) {
            return Err(Error::validation("invalid email address"));
        }

        let response = self.auth.login(&credentials).await?;

        let session = Session {
            token: response.access_token.clone(),
            user: response.user.clone(),
        };
        if self.persist_session {
            self.store.save(&session).await?;
        }

        *self.token.write().unwrap() = Some(session.token);
        self.state.send_modify(|s| {
            s.authenticated = true;
            s.user = Some(response.user.clone());
        });

        // Fire-and-forget welcome event; login does not wait on it.
        self.notify(
            "welcome",
            format!("Welcome back, {}!", response.user.name),
            None,
        );

        self.refresh_in_background();

        Ok(response.user)
    }

    /// Log out, cancelling any in-flight data load.
    ///
    /// The server call is best-effort: its failure is logged but the local
    /// session is cleared unconditionally either way.
    pub async fn logout(&self) {
        if let Some(handle) = self.load_cancel.lock().unwrap().take() {
            handle.cancel();
        }

        let token = self.token.read().unwrap().clone();
        if let Some(token) = token {
            if let Err(err) = self.auth.logout(&token).await {
                warn!(error = %err, "server logout failed; clearing local session anyway");
            }
        }

        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }
        *self.token.write().unwrap() = None;
        self.state.send_replace(AppState::default());
    }

    /// Fan-out fetch of every collection the UI depends on.
    ///
    /// No-op when no user is present or a load is already in flight. The
    /// four sub-fetches are issued concurrently and joined before any
    /// state mutation; if any one fails the whole refresh fails and no
    /// collection changes (stale-but-consistent beats partial overwrite).
    /// Cancellation is swallowed silently.
    pub async fn load_user_data(&self) -> Result<(), Error> {
        let user = match self.state.borrow().user.clone() {
            Some(user) => user,
            None => return Ok(()),
        };
        if self.loading_user_data.swap(true, Ordering::SeqCst) {
            debug!("data load already in flight; dropping duplicate call");
            return Ok(());
        }

        let result = self.load_user_data_inner(&user).await;
        self.loading_user_data.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_cancelled() => {
                debug!("data load cancelled");
                Ok(())
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, "failed to load user data");
                Err(err)
            }
        }
    }

    async fn load_user_data_inner(&self, user: &User) -> Result<(), Error> {
        let token = self.require_token()?;

        let (handle, cancel) = cancel_pair();
        *self.load_cancel.lock().unwrap() = Some(handle);

        let (tanks, orders, suppliers, notifications) = tokio::try_join!(
            self.tanks.list(&token, &cancel),
            self.orders.list(&token, &cancel),
            self.suppliers.list(&token, &cancel),
            self.notifications.list(&token, &cancel),
        )?;

        self.state.send_modify(|s| {
            // Keep the current tank selection when it survives the
            // refresh, otherwise fall back to the first tank.
            let selected = s
                .selected_tank
                .as_ref()
                .and_then(|id| tanks.iter().find(|t| &t.id == id))
                .or_else(|| tanks.first());
            match selected {
                Some(tank) => {
                    let tank = tank.clone();
                    s.mirror_tank(&tank);
                }
                None => {
                    s.selected_tank = None;
                    s.tank_capacity = 0.0;
                    s.avg_daily_usage = 0.0;
                    s.current_level = 0.0;
                }
            }
            s.tanks = tanks;
            s.orders = orders;
            s.suppliers = suppliers;
            s.notifications = notifications;
            s.auto_order = user.auto_order;
            s.preferred_supplier = user.preferred_supplier.clone();
            s.notification_preferences =
                user.notification_preferences.clone().unwrap_or_default();
        });

        Ok(())
    }

    /// Place a new order.
    ///
    /// On success a confirmation notification is synthesized and a
    /// background refresh picks up the new order; on failure the error is
    /// returned so the order form can stay open.
    pub async fn place_order(&self, order: NewOrder) -> Result<Order, Error> {
        let token = self.require_token()?;

        match self.orders.place(&token, &order).await {
            Ok(created) => {
                self.notify(
                    "order",
                    format!("Order #{} placed", created.order_number),
                    Some(created.id.clone()),
                );
                self.refresh_in_background();
                Ok(created)
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, "failed to place order");
                Err(err)
            }
        }
    }

    /// Cancel an order. Boolean outcome by design: callers branch on the
    /// result rather than catching an error.
    pub async fn cancel_order(&self, order_id: &str) -> bool {
        let token = match self.require_token() {
            Ok(token) => token,
            Err(_) => return false,
        };

        match self.orders.cancel(&token, order_id).await {
            Ok(()) => {
                self.notify(
                    "order",
                    "Your order has been cancelled".to_string(),
                    Some(order_id.to_string()),
                );
                self.refresh_in_background();
                true
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, order_id, "failed to cancel order");
                false
            }
        }
    }

    /// Move an order's scheduled delivery to a new date.
    ///
    /// The date must parse and the order must exist in the current
    /// collection before any request is issued; on acceptance only the
    /// affected order is patched locally (no full refresh).
    pub async fn reschedule_order(
        &self,
        order_id: &str,
        new_date: &str,
    ) -> Result<(), Error> {
        let new_date = new_date
            .parse::<chrono::DateTime<chrono::Utc>>()
            .map_err(|_| Error::validation("invalid delivery date"))?;

        let known = self.state.borrow().orders.iter().any(|o| o.id == order_id);
        if !known {
            return Err(Error::validation(format!(
                "order {} is not in the current order list",
                order_id
            )));
        }

        let token = self.require_token()?;
        match self.orders.reschedule(&token, order_id, new_date).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    if let Some(order) = s.orders.iter_mut().find(|o| o.id == order_id) {
                        order.scheduled_delivery_date = Some(new_date);
                    }
                });
                self.notify(
                    "delivery",
                    format!("Delivery rescheduled to {}", new_date.format("%b %e, %Y")),
                    Some(order_id.to_string()),
                );
                Ok(())
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, order_id, "failed to reschedule order");
                Err(err)
            }
        }
    }

    /// Flip the auto-order preference.
    ///
    /// Optimistic with a compensating rollback: the switch flips locally
    /// first and reverts if persistence fails. Returns the value now in
    /// effect.
    pub async fn toggle_auto_order(&self) -> Result<bool, Error> {
        let token = self.require_token()?;
        let user_id = self
            .state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or_else(|| Error::Unauthorized("not logged in".to_string()))?;

        let mut new_value = false;
        self.state.send_modify(|s| {
            s.auto_order = !s.auto_order;
            new_value = s.auto_order;
            if let Some(user) = s.user.as_mut() {
                user.auto_order = new_value;
            }
        });

        let result = self
            .users
            .patch_fields(&token, &user_id, &json!({ "autoOrder": new_value }))
            .await;

        match result {
            Ok(()) => Ok(new_value),
            Err(err) => {
                self.state.send_modify(|s| {
                    s.auto_order = !new_value;
                    if let Some(user) = s.user.as_mut() {
                        user.auto_order = !new_value;
                    }
                });
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, "failed to persist auto-order; rolled back");
                Err(err)
            }
        }
    }

    /// Save the per-channel notification opt-ins (optimistic with
    /// rollback).
    pub async fn set_notification_preferences(
        &self,
        prefs: NotificationPreferences,
    ) -> Result<(), Error> {
        let token = self.require_token()?;
        let user_id = self
            .state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or_else(|| Error::Unauthorized("not logged in".to_string()))?;

        let previous = self.state.borrow().notification_preferences.clone();
        self.state.send_modify(|s| {
            s.notification_preferences = prefs.clone();
            if let Some(user) = s.user.as_mut() {
                user.notification_preferences = Some(prefs.clone());
            }
        });

        let result = self
            .users
            .patch_fields(&token, &user_id, &json!({ "notificationPreferences": prefs }))
            .await;

        if let Err(err) = result {
            self.state.send_modify(|s| {
                s.notification_preferences = previous.clone();
                if let Some(user) = s.user.as_mut() {
                    user.notification_preferences = Some(previous.clone());
                }
            });
            let err = self.absorb_unauthorized(err).await;
            error!(error = %err, "failed to persist notification preferences; rolled back");
            return Err(err);
        }
        Ok(())
    }

    /// Set the preferred supplier (optimistic with rollback).
    pub async fn set_preferred_supplier(&self, supplier_id: Option<String>) -> Result<(), Error> {
        let token = self.require_token()?;
        let user_id = self
            .state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or_else(|| Error::Unauthorized("not logged in".to_string()))?;

        let previous = self.state.borrow().preferred_supplier.clone();
        self.state.send_modify(|s| {
            s.preferred_supplier = supplier_id.clone();
            if let Some(user) = s.user.as_mut() {
                user.preferred_supplier = supplier_id.clone();
            }
        });

        let result = self
            .users
            .patch_fields(&token, &user_id, &json!({ "preferredSupplier": supplier_id }))
            .await;

        if let Err(err) = result {
            self.state.send_modify(|s| {
                s.preferred_supplier = previous.clone();
                if let Some(user) = s.user.as_mut() {
                    user.preferred_supplier = previous.clone();
                }
            });
            let err = self.absorb_unauthorized(err).await;
            error!(error = %err, "failed to persist preferred supplier; rolled back");
            return Err(err);
        }
        Ok(())
    }

    /// Patch a tank's configuration and refresh the mirrored dashboard
    /// fields from the server's updated record.
    pub async fn save_tank_settings(
        &self,
        tank_id: &str,
        settings: TankSettings,
    ) -> Result<(), Error> {
        let token = self.require_token()?;

        match self.tanks.update_settings(&token, tank_id, &settings).await {
            Ok(updated) => {
                self.state.send_modify(|s| {
                    if let Some(tank) = s.tanks.iter_mut().find(|t| t.id == updated.id) {
                        *tank = updated.clone();
                    }
                    if s.selected_tank.as_deref() == Some(updated.id.as_str()) {
                        s.mirror_tank(&updated);
                    }
                });
                Ok(())
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, tank_id, "failed to save tank settings");
                Err(err)
            }
        }
    }

    /// Switch the dashboard to another owned tank
    pub fn select_tank(&self, tank_id: &str) -> Result<(), Error> {
        let tank = self
            .state
            .borrow()
            .tanks
            .iter()
            .find(|t| t.id == tank_id)
            .cloned();
        match tank {
            Some(tank) => {
                self.state.send_modify(|s| s.mirror_tank(&tank));
                Ok(())
            }
            None => Err(Error::validation(format!("unknown tank {}", tank_id))),
        }
    }

    /// Update profile fields, keeping the persisted user blob in sync
    pub async fn update_profile(&self, profile: UserProfile) -> Result<(), Error> {
        let token = self.require_token()?;

        match self.users.update_profile(&token, &profile).await {
            Ok(updated) => {
                self.state.send_modify(|s| s.user = Some(updated.clone()));
                if self.persist_session {
                    let session = Session {
                        token,
                        user: updated,
                    };
                    if let Err(err) = self.store.save(&session).await {
                        warn!(error = %err, "failed to persist updated user record");
                    }
                }
                Ok(())
            }
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, "failed to update profile");
                Err(err)
            }
        }
    }

    /// Change the account password
    pub async fn change_password(&self, change: PasswordChange) -> Result<(), Error> {
        let token = self.require_token()?;
        match self.users.change_password(&token, &change).await {
            Ok(()) => Ok(()),
            Err(err) => {
                let err = self.absorb_unauthorized(err).await;
                error!(error = %err, "failed to change password");
                Err(err)
            }
        }
    }

    /// Record a synthesized notification without blocking the calling
    /// operation.
    fn notify(&self, kind: &str, message: String, related_to: Option<String>) {
        let token = match self.token.read().unwrap().clone() {
            Some(token) => token,
            None => return,
        };
        let api = self.notifications.clone();
        let notification = NewNotification {
            kind: kind.to_string(),
            message,
            related_to,
        };
        tokio::spawn(async move {
            if let Err(err) = api.create(&token, &notification).await {
                warn!(error = %err, "failed to record notification");
            }
        });
    }

    fn refresh_in_background(&self) {
        let Some(this) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let _ = this.load_user_data().await;
        });
    }

    /// A 401 anywhere is authoritative: clear the persisted session and
    /// flip the authenticated flag in the same step, so the UI can never
    /// show a session whose stored token is already gone.
    async fn absorb_unauthorized(&self, err: Error) -> Error {
        if err.is_unauthorized() {
            warn!("authentication rejected; clearing local session");
            if let Err(store_err) = self.store.clear().await {
                warn!(error = %store_err, "failed to clear persisted session");
            }
            *self.token.write().unwrap() = None;
            self.state.send_replace(AppState::default());
        }
        err
    }
}
