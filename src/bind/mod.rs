//! Declarative binding of document trees onto typed models.
//!
//! A model declares its fields with the [`save_model!`] macro; [`bind`]
//! walks a parsed [`SaveObject`] and fills a fresh instance. Binding never
//! fails as a whole: a field that is missing or has the wrong shape keeps
//! its default value, and the mismatch is recorded as a diagnostic.

use std::collections::BTreeMap;
use std::str::FromStr;

use uuid::Uuid;

use crate::types::{Element, SaveDate, Scalar, SaveObject, ScalarValue};

/// A single field-level conversion failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot bind {found} to {expected}")]
pub struct BindFieldError {
    pub expected: &'static str,
    pub found: String,
}

impl BindFieldError {
    pub fn new(expected: &'static str, element: &Element) -> Self {
        let found = match element {
            Element::Scalar(scalar) => {
                format!("{} '{}'", scalar.value().type_name(), scalar.raw())
            }
            other => other.type_name().to_string(),
        };
        BindFieldError { expected, found }
    }
}

/// A suppressed binding failure, tagged with the key it happened under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindDiagnostic {
    pub key: String,
    pub error: BindFieldError,
}

/// Collects suppressed field errors during a bind.
#[derive(Debug, Default)]
pub struct BindDiagnostics {
    events: Vec<BindDiagnostic>,
}

impl BindDiagnostics {
    pub fn record(&mut self, key: &str, error: BindFieldError) {
        tracing::debug!(key, error = %error, "field binding suppressed");
        self.events.push(BindDiagnostic {
            key: key.to_string(),
            error,
        });
    }

    pub fn events(&self) -> &[BindDiagnostic] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Conversion from a document element into a typed value.
pub trait FromSave: Sized {
    fn from_save(
        element: &Element,
        diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError>;
}

/// A model whose fields are populated from an object's entries.
pub trait SaveModel: Default {
    fn bind_fields(object: &SaveObject, diagnostics: &mut BindDiagnostics) -> Self;
}

/// Bind a model from a parsed object. Fields without a usable source
/// value keep their defaults; mismatches are logged and dropped.
pub fn bind<T: SaveModel>(object: &SaveObject) -> T {
    let mut diagnostics = BindDiagnostics::default();
    T::bind_fields(object, &mut diagnostics)
}

/// Like [`bind`], but also returns the suppressed field errors.
pub fn bind_with_diagnostics<T: SaveModel>(object: &SaveObject) -> (T, BindDiagnostics) {
    let mut diagnostics = BindDiagnostics::default();
    let model = T::bind_fields(object, &mut diagnostics);
    (model, diagnostics)
}

/// The literal `none` marks an absent value in save text.
fn is_none_literal(element: &Element) -> bool {
    matches!(element, Element::Scalar(s) if s.as_str() == Some("none"))
}

fn scalar_of(element: &Element) -> Option<&Scalar> {
    match element {
        Element::Scalar(scalar) => Some(scalar),
        _ => None,
    }
}

impl FromSave for i32 {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let mismatch = || BindFieldError::new("i32", element);
        let scalar = scalar_of(element).ok_or_else(mismatch)?;
        match scalar.value() {
            ScalarValue::Int32(n) => Ok(*n),
            ScalarValue::Int64(n) => i32::try_from(*n).map_err(|_| mismatch()),
            // Whole-valued floats narrow; fractional ones do not.
            ScalarValue::Float(f)
                if f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64 =>
            {
                Ok(*f as i32)
            }
            _ => Err(mismatch()),
        }
    }
}

impl FromSave for i64 {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let mismatch = || BindFieldError::new("i64", element);
        let scalar = scalar_of(element).ok_or_else(mismatch)?;
        match scalar.value() {
            ScalarValue::Int32(n) => Ok(i64::from(*n)),
            ScalarValue::Int64(n) => Ok(*n),
            ScalarValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            _ => Err(mismatch()),
        }
    }
}

impl FromSave for f64 {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let mismatch = || BindFieldError::new("f64", element);
        let scalar = scalar_of(element).ok_or_else(mismatch)?;
        match scalar.value() {
            ScalarValue::Int32(n) => Ok(f64::from(*n)),
            ScalarValue::Int64(n) => Ok(*n as f64),
            ScalarValue::Float(f) => Ok(*f),
            _ => Err(mismatch()),
        }
    }
}

impl FromSave for f32 {
    fn from_save(
        element: &Element,
        diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        f64::from_save(element, diagnostics).map(|f| f as f32)
    }
}

impl FromSave for bool {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        scalar_of(element)
            .and_then(Scalar::as_bool)
            .ok_or_else(|| BindFieldError::new("bool", element))
    }
}

impl FromSave for String {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let scalar = scalar_of(element).ok_or_else(|| BindFieldError::new("string", element))?;
        match scalar.value() {
            ScalarValue::String(s) | ScalarValue::Identifier(s) => Ok(s.clone()),
            _ => Err(BindFieldError::new("string", element)),
        }
    }
}

impl FromSave for SaveDate {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        scalar_of(element)
            .and_then(Scalar::as_date)
            .ok_or_else(|| BindFieldError::new("date", element))
    }
}

impl FromSave for Uuid {
    fn from_save(
        element: &Element,
        _diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        scalar_of(element)
            .and_then(Scalar::as_guid)
            .ok_or_else(|| BindFieldError::new("guid", element))
    }
}

impl<T: FromSave> FromSave for Option<T> {
    fn from_save(
        element: &Element,
        diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        if is_none_literal(element) {
            return Ok(None);
        }
        T::from_save(element, diagnostics).map(Some)
    }
}

impl<T: FromSave> FromSave for Vec<T> {
    fn from_save(
        element: &Element,
        diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let mut items = Vec::new();
        push_items(element, &mut items, diagnostics);
        Ok(items)
    }
}

/// Append an element's contents to a list slot. An array contributes each
/// of its items; anything else contributes itself as a single item.
fn push_items<T: FromSave>(
    element: &Element,
    items: &mut Vec<T>,
    diagnostics: &mut BindDiagnostics,
) {
    match element {
        Element::Arr(values) => {
            for value in values {
                push_one(value, items, diagnostics);
            }
        }
        other => push_one(other, items, diagnostics),
    }
}

fn push_one<T: FromSave>(
    element: &Element,
    items: &mut Vec<T>,
    diagnostics: &mut BindDiagnostics,
) {
    // `none` placeholders vanish from lists without a diagnostic.
    if is_none_literal(element) {
        return;
    }
    match T::from_save(element, diagnostics) {
        Ok(item) => items.push(item),
        Err(error) => diagnostics.record("<item>", error),
    }
}

impl<K, V> FromSave for BTreeMap<K, V>
where
    K: FromStr + Ord,
    V: FromSave,
{
    fn from_save(
        element: &Element,
        diagnostics: &mut BindDiagnostics,
    ) -> Result<Self, BindFieldError> {
        let Element::Obj(object) = element else {
            return Err(BindFieldError::new("dictionary", element));
        };
        let mut map = BTreeMap::new();
        for (key, value) in object.iter() {
            // Keys that do not parse as K are not entries of this map.
            let Ok(parsed_key) = key.parse::<K>() else {
                continue;
            };
            match V::from_save(value, diagnostics) {
                Ok(parsed_value) => {
                    map.insert(parsed_key, parsed_value);
                }
                Err(error) => diagnostics.record(key, error),
            }
        }
        Ok(map)
    }
}

/// Fill a scalar-shaped slot from the first entry matching `key`.
pub fn bind_scalar<T: FromSave>(
    object: &SaveObject,
    key: &str,
    slot: &mut T,
    diagnostics: &mut BindDiagnostics,
) {
    let Some(element) = object.get(key) else {
        return;
    };
    match T::from_save(element, diagnostics) {
        Ok(value) => *slot = value,
        Err(error) => diagnostics.record(key, error),
    }
}

/// Fill a nested-model slot; same first-match rule as scalars.
pub fn bind_object<T: FromSave>(
    object: &SaveObject,
    key: &str,
    slot: &mut T,
    diagnostics: &mut BindDiagnostics,
) {
    bind_scalar(object, key, slot, diagnostics);
}

/// Fill a list slot by gathering every entry matching `key`, in source
/// order. An entry whose value is an array is spliced item by item.
pub fn bind_array<T: FromSave>(
    object: &SaveObject,
    key: &str,
    slot: &mut Vec<T>,
    diagnostics: &mut BindDiagnostics,
) {
    let mut items = Vec::new();
    let mut matched = false;
    for (entry_key, value) in object.iter() {
        if entry_key == key {
            matched = true;
            push_items(value, &mut items, diagnostics);
        }
    }
    if matched {
        *slot = items;
    }
}

/// Fill a dictionary slot from the first entry matching `key`.
pub fn bind_dictionary<K, V>(
    object: &SaveObject,
    key: &str,
    slot: &mut BTreeMap<K, V>,
    diagnostics: &mut BindDiagnostics,
) where
    K: FromStr + Ord,
    V: FromSave,
{
    bind_scalar(object, key, slot, diagnostics);
}

/// Declares a model struct together with its binding plan.
///
/// Each field names one of four capabilities and the save key it reads:
///
/// ```
/// clausewitz_save::save_model! {
///     pub struct Galaxy {
///         scalar("name") name: String,
///         scalar("num_empires") num_empires: i32,
///     }
/// }
///
/// let doc = clausewitz_save::parse("name=\"Andromeda\"\nnum_empires=12").unwrap();
/// let galaxy: Galaxy = clausewitz_save::bind(&doc);
/// assert_eq!(galaxy.num_empires, 12);
/// ```
#[macro_export]
macro_rules! save_model {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $kind:ident($key:literal) $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_attr])*
                pub $field: $ty,
            )*
        }

        impl $crate::bind::SaveModel for $name {
            fn bind_fields(
                object: &$crate::SaveObject,
                diagnostics: &mut $crate::bind::BindDiagnostics,
            ) -> Self {
                let mut model = Self::default();
                $(
                    $crate::save_model!(@bind $kind, object, $key, &mut model.$field, diagnostics);
                )*
                model
            }
        }

        impl $crate::bind::FromSave for $name {
            fn from_save(
                element: &$crate::Element,
                diagnostics: &mut $crate::bind::BindDiagnostics,
            ) -> ::std::result::Result<Self, $crate::bind::BindFieldError> {
                match element {
                    $crate::Element::Obj(object) => {
                        Ok(<Self as $crate::bind::SaveModel>::bind_fields(object, diagnostics))
                    }
                    other => Err($crate::bind::BindFieldError::new("object", other)),
                }
            }
        }
    };
    (@bind scalar, $object:ident, $key:literal, $slot:expr, $diag:ident) => {
        $crate::bind::bind_scalar($object, $key, $slot, $diag)
    };
    (@bind object, $object:ident, $key:literal, $slot:expr, $diag:ident) => {
        $crate::bind::bind_object($object, $key, $slot, $diag)
    };
    (@bind array, $object:ident, $key:literal, $slot:expr, $diag:ident) => {
        $crate::bind::bind_array($object, $key, $slot, $diag)
    };
    (@bind dictionary, $object:ident, $key:literal, $slot:expr, $diag:ident) => {
        $crate::bind::bind_dictionary($object, $key, $slot, $diag)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse;

    crate::save_model! {
        struct Ship {
            scalar("name") name: String,
            scalar("hull") hull: f64,
            scalar("alive") alive: bool,
        }
    }

    crate::save_model! {
        struct Fleet {
            scalar("owner") owner: i32,
            array("ship") ships: Vec<Ship>,
            object("flagship") flagship: Option<Ship>,
            dictionary("orders") orders: BTreeMap<i64, String>,
        }
    }

    #[rstest::rstest]
    fn test_scalar_fields_bind_first_match() {
        let doc = parse("name=\"Valiant\"\nhull=0.75\nalive=yes\nname=\"Shadow\"").unwrap();
        let ship: Ship = bind(&doc);
        assert_eq!(ship.name, "Valiant");
        assert_eq!(ship.hull, 0.75);
        assert!(ship.alive);
    }

    #[rstest::rstest]
    fn test_missing_fields_keep_defaults() {
        let doc = parse("owner=5").unwrap();
        let (fleet, diagnostics) = bind_with_diagnostics::<Fleet>(&doc);
        assert_eq!(fleet.owner, 5);
        assert!(fleet.ships.is_empty());
        assert_eq!(fleet.flagship, None);
        assert!(diagnostics.is_empty());
    }

    #[rstest::rstest]
    fn test_duplicate_keys_gather_into_array_field() {
        let doc = parse("ship={ name=\"A\" }\nship={ name=\"B\" }").unwrap();
        let fleet: Fleet = bind(&doc);
        let names: Vec<&str> = fleet.ships.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[rstest::rstest]
    fn test_array_value_is_spliced_into_array_field() {
        crate::save_model! {
            struct Colors {
                array("colors") colors: Vec<String>,
            }
        }
        let doc = parse("colors={ red green }\ncolors={ blue }").unwrap();
        let model: Colors = bind(&doc);
        assert_eq!(model.colors, vec!["red", "green", "blue"]);
    }

    #[rstest::rstest]
    fn test_none_literal_clears_option_and_skips_in_lists() {
        let doc = parse("flagship=none\nship=none\nship={ name=\"C\" }").unwrap();
        let (fleet, diagnostics) = bind_with_diagnostics::<Fleet>(&doc);
        assert_eq!(fleet.flagship, None);
        assert_eq!(fleet.ships.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[rstest::rstest]
    fn test_dictionary_skips_unparseable_keys() {
        let doc = parse("orders={ 1=\"patrol\" stray=\"x\" 2=\"guard\" }").unwrap();
        let fleet: Fleet = bind(&doc);
        assert_eq!(fleet.orders.len(), 2);
        assert_eq!(fleet.orders.get(&1).map(String::as_str), Some("patrol"));
        assert_eq!(fleet.orders.get(&2).map(String::as_str), Some("guard"));
    }

    #[rstest::rstest]
    fn test_mismatch_is_recorded_not_raised() {
        let doc = parse("owner={ nested=1 }").unwrap();
        let (fleet, diagnostics) = bind_with_diagnostics::<Fleet>(&doc);
        assert_eq!(fleet.owner, 0);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.events()[0].key, "owner");
        assert_eq!(diagnostics.events()[0].error.expected, "i32");
    }

    #[rstest::rstest]
    #[case("v=5", Some(5))]
    #[case("v=3000000000", None)] // i64 out of i32 range
    #[case("v=4.0", Some(4))]
    #[case("v=4.5", None)]
    fn test_i32_widening_rules(#[case] input: &str, #[case] expected: Option<i32>) {
        let doc = parse(input).unwrap();
        let mut diagnostics = BindDiagnostics::default();
        let result = i32::from_save(doc.get("v").unwrap(), &mut diagnostics);
        assert_eq!(result.ok(), expected);
    }

    #[rstest::rstest]
    fn test_i64_accepts_i32() {
        let doc = parse("v=5").unwrap();
        let mut diagnostics = BindDiagnostics::default();
        assert_eq!(
            i64::from_save(doc.get("v").unwrap(), &mut diagnostics).ok(),
            Some(5),
        );
    }

    #[rstest::rstest]
    fn test_f64_accepts_any_numeric() {
        let doc = parse("a=5\nb=3000000000\nc=0.5").unwrap();
        let mut diagnostics = BindDiagnostics::default();
        for (key, expected) in [("a", 5.0), ("b", 3_000_000_000.0), ("c", 0.5)] {
            assert_eq!(
                f64::from_save(doc.get(key).unwrap(), &mut diagnostics).ok(),
                Some(expected),
            );
        }
    }

    #[rstest::rstest]
    fn test_string_accepts_identifier_but_not_number() {
        let doc = parse("a=fleet_name\nb=42").unwrap();
        let mut diagnostics = BindDiagnostics::default();
        assert!(String::from_save(doc.get("a").unwrap(), &mut diagnostics).is_ok());
        assert!(String::from_save(doc.get("b").unwrap(), &mut diagnostics).is_err());
    }
}
