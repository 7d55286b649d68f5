//! Per-user calendar preference resolution.
//!
//! The resolver is parameterized over an injected [`PreferenceStore`] rather
//! than reaching for ambient host state, so tests and standalone use get an
//! explicitly owned [`MemoryStore`]. Every operation is a stateless
//! read/compose over that store; precedence is user override, then the
//! system default, then [`DEFAULT_CALENDAR`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Hardcoded fallback when neither a user nor a system preference is set.
pub const DEFAULT_CALENDAR: Calendar = Calendar::Jalali;

/// One of the two supported calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calendar {
    Jalali,
    Gregorian,
}

impl Calendar {
    /// Canonical lowercase name, as stored and serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jalali => "jalali",
            Self::Gregorian => "gregorian",
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Calendar {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jalali" => Ok(Self::Jalali),
            "gregorian" => Ok(Self::Gregorian),
            _ => Err(PreferenceError::UnknownCalendar(s.trim().to_owned())),
        }
    }
}

/// Which precedence tier supplied a resolved calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSource {
    Default,
    System,
    User,
}

/// A resolved calendar together with its provenance.
///
/// Computed fresh on every query; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarSelection {
    pub calendar: Calendar,
    pub source: CalendarSource,
}

/// Target of a preference write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    System,
    User,
}

impl FromStr for Scope {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            _ => Err(PreferenceError::UnknownScope(s.trim().to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    /// Calendar name outside `{jalali, gregorian}` after trimming/lowercasing.
    #[error("calendar must be one of: gregorian, jalali (got {0:?})")]
    UnknownCalendar(String),

    /// Scope name outside `{system, user}` after trimming/lowercasing.
    #[error("scope must be either \"system\" or \"user\" (got {0:?})")]
    UnknownScope(String),

    /// A per-user write with no explicit user and no ambient identity.
    #[error("cannot store a calendar preference without a user identity")]
    MissingUser,
}

/// Key-value state the resolver reads and writes through.
///
/// The store is owned by the host environment; entries are optional strings
/// and an absent entry means "unset". Writes are last-write-wins at the
/// store's own consistency boundary.
pub trait PreferenceStore {
    /// The system-wide slot, if set.
    fn system_value(&self) -> Option<String>;

    /// Overwrites the system-wide slot.
    fn set_system_value(&self, value: &str);

    /// The per-user slot, if set.
    fn user_value(&self, user: &str) -> Option<String>;

    /// Overwrites the per-user slot.
    fn set_user_value(&self, user: &str, value: &str);

    /// Identity of the ambient session, if any. `None` signals an anonymous
    /// or system context.
    fn current_user(&self) -> Option<String> {
        None
    }
}

/// In-memory [`PreferenceStore`] for standalone and test use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    system: Mutex<Option<String>>,
    users: Mutex<HashMap<String, String>>,
    ambient_user: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose ambient session is fixed to the given user.
    pub fn with_ambient_user(user: impl Into<String>) -> Self {
        Self {
            ambient_user: Some(user.into()),
            ..Self::default()
        }
    }
}

fn relock<T>(result: Result<T, PoisonError<T>>) -> T {
    result.unwrap_or_else(PoisonError::into_inner)
}

impl PreferenceStore for MemoryStore {
    fn system_value(&self) -> Option<String> {
        relock(self.system.lock()).clone()
    }

    fn set_system_value(&self, value: &str) {
        *relock(self.system.lock()) = Some(value.to_owned());
    }

    fn user_value(&self, user: &str) -> Option<String> {
        relock(self.users.lock()).get(user).cloned()
    }

    fn set_user_value(&self, user: &str, value: &str) {
        relock(self.users.lock()).insert(user.to_owned(), value.to_owned());
    }

    fn current_user(&self) -> Option<String> {
        self.ambient_user.clone()
    }
}

/// Serializable snapshot of the resolved preference state.
///
/// Unset raw values are omitted from the serialized form, not emitted as
/// null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceContext {
    pub active_calendar: Calendar,
    pub source: CalendarSource,
    pub is_jalali_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_calendar: Option<Calendar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_calendar: Option<Calendar>,
}

/// Resolves which calendar is active for a user.
///
/// All user parameters are optional; `None` means "the store's ambient
/// session identity".
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored system calendar, falling back to [`DEFAULT_CALENDAR`].
    pub fn system_calendar(&self) -> Calendar {
        self.raw_system_calendar().unwrap_or(DEFAULT_CALENDAR)
    }

    /// The stored system calendar without the default fallback.
    ///
    /// An unparseable stored value reads as unset, never as an error.
    pub fn raw_system_calendar(&self) -> Option<Calendar> {
        self.store.system_value().and_then(|v| v.parse().ok())
    }

    /// Validates and persists the system-wide calendar.
    ///
    /// # Errors
    /// `PreferenceError::UnknownCalendar` for any name outside the supported
    /// set.
    pub fn set_system_calendar(&self, calendar: &str) -> Result<CalendarSelection, PreferenceError> {
        let selected: Calendar = calendar.parse()?;
        self.store.set_system_value(selected.as_str());
        Ok(self.resolve(None))
    }

    /// The calendar stored for a user, if any.
    pub fn user_calendar(&self, user: Option<&str>) -> Option<Calendar> {
        let id = self.user_id(user)?;
        self.store.user_value(&id).and_then(|v| v.parse().ok())
    }

    /// Validates and persists a per-user calendar.
    ///
    /// # Errors
    /// `PreferenceError::UnknownCalendar` for an unsupported name, and
    /// `PreferenceError::MissingUser` when neither an explicit user nor an
    /// ambient identity is available.
    pub fn set_user_calendar(
        &self,
        calendar: &str,
        user: Option<&str>,
    ) -> Result<CalendarSelection, PreferenceError> {
        let selected: Calendar = calendar.parse()?;
        let id = self.user_id(user).ok_or(PreferenceError::MissingUser)?;
        self.store.set_user_value(&id, selected.as_str());
        Ok(self.resolve(user))
    }

    /// Resolves the active calendar: user override, then system default,
    /// then [`DEFAULT_CALENDAR`], tagged with the supplying tier.
    pub fn resolve(&self, user: Option<&str>) -> CalendarSelection {
        if let Some(calendar) = self.user_calendar(user) {
            return CalendarSelection {
                calendar,
                source: CalendarSource::User,
            };
        }
        if let Some(calendar) = self.raw_system_calendar() {
            return CalendarSelection {
                calendar,
                source: CalendarSource::System,
            };
        }
        CalendarSelection {
            calendar: DEFAULT_CALENDAR,
            source: CalendarSource::Default,
        }
    }

    /// Whether the Jalali calendar is active for the user.
    pub fn is_jalali_enabled(&self, user: Option<&str>) -> bool {
        self.resolve(user).calendar == Calendar::Jalali
    }

    /// Snapshot of the resolved state for serialization toward a host.
    pub fn preference_context(&self, user: Option<&str>) -> PreferenceContext {
        let resolved = self.resolve(user);
        PreferenceContext {
            active_calendar: resolved.calendar,
            source: resolved.source,
            is_jalali_enabled: resolved.calendar == Calendar::Jalali,
            system_calendar: self.raw_system_calendar(),
            user_calendar: self.user_calendar(user),
        }
    }

    /// Dispatches a write to the system or user scope and returns the
    /// post-write context for that scope. An empty scope string means the
    /// user scope.
    ///
    /// # Errors
    /// `PreferenceError::UnknownScope` for a scope outside `{system, user}`,
    /// plus whatever the dispatched setter raises.
    pub fn set_preference(
        &self,
        scope: &str,
        calendar: &str,
        user: Option<&str>,
    ) -> Result<PreferenceContext, PreferenceError> {
        let scope = if scope.trim().is_empty() {
            Scope::User
        } else {
            scope.parse()?
        };
        match scope {
            Scope::System => {
                self.set_system_calendar(calendar)?;
                Ok(self.preference_context(None))
            }
            Scope::User => {
                self.set_user_calendar(calendar, user)?;
                Ok(self.preference_context(user))
            }
        }
    }

    // An explicit but blank id is treated as missing, never substituted
    // with the ambient identity.
    fn user_id(&self, user: Option<&str>) -> Option<String> {
        match user {
            Some(id) => {
                let id = id.trim();
                (!id.is_empty()).then(|| id.to_owned())
            }
            None => self.store.current_user(),
        }
    }
}
