/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    Empty,
    /// The input contained whitespace or control characters
    #[error("identifier cannot contain whitespace or control characters")]
    ForbiddenCharacter,
    /// The input collides with a reserved filesystem token
    #[error("identifier is not usable as a storage key")]
    ReservedToken,
}

fn validate_token(input: &str) -> Result<&str, IdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }
    if trimmed
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(IdError::ForbiddenCharacter);
    }
    Ok(trimmed)
}

/// A physician's professional registration number (e.g. a CRM number).
///
/// This type wraps a `String` and guarantees a non-empty, single-token
/// identifier that is safe to use as a storage key: no whitespace, no
/// control characters, no path separators, and not a reserved directory
/// name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicianId(String);

impl PhysicianId {
    /// Creates a new `PhysicianId` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the trimmed input is empty,
    /// `IdError::ForbiddenCharacter` if it contains whitespace, control
    /// characters, or path separators, and `IdError::ReservedToken` if it
    /// is `.` or `..`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = validate_token(input.as_ref())?;
        if trimmed.contains(['/', '\\']) {
            return Err(IdError::ForbiddenCharacter);
        }
        if trimmed == "." || trimmed == ".." {
            return Err(IdError::ReservedToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner registration number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A patient identifier as issued by the clinic (e.g. a CPF number).
///
/// Guarantees a non-empty, single-token identifier with no whitespace or
/// control characters. The clinic issues these; this crate never
/// generates them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new `PatientId` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before
    /// validation.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the trimmed input is empty and
    /// `IdError::ForbiddenCharacter` if it contains whitespace or control
    /// characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = validate_token(input.as_ref())?;
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_traits {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ty::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_id_traits!(PhysicianId);
impl_id_traits!(PatientId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physician_id_trims_surrounding_whitespace() {
        let id = PhysicianId::new("  12345  ").expect("valid registration number");
        assert_eq!(id.as_str(), "12345");
    }

    #[test]
    fn physician_id_rejects_empty_input() {
        let err = PhysicianId::new("   ").expect_err("should reject blank input");
        assert!(matches!(err, IdError::Empty));
    }

    #[test]
    fn physician_id_rejects_inner_whitespace() {
        let err = PhysicianId::new("12 345").expect_err("should reject inner whitespace");
        assert!(matches!(err, IdError::ForbiddenCharacter));
    }

    #[test]
    fn physician_id_rejects_path_separators() {
        let err = PhysicianId::new("123/45").expect_err("should reject path separator");
        assert!(matches!(err, IdError::ForbiddenCharacter));
    }

    #[test]
    fn physician_id_rejects_reserved_directory_names() {
        let err = PhysicianId::new("..").expect_err("should reject dot-dot");
        assert!(matches!(err, IdError::ReservedToken));
    }

    #[test]
    fn patient_id_accepts_cpf_style_input() {
        let id = PatientId::new("123.456.789-09").expect("valid patient id");
        assert_eq!(id.as_str(), "123.456.789-09");
        assert_eq!(id.to_string(), "123.456.789-09");
    }

    #[test]
    fn patient_id_rejects_control_characters() {
        let err = PatientId::new("abc\u{7}def").expect_err("should reject control character");
        assert!(matches!(err, IdError::ForbiddenCharacter));
    }

    #[test]
    fn ids_order_lexicographically() {
        let a = PhysicianId::new("100").unwrap();
        let b = PhysicianId::new("200").unwrap();
        assert!(a < b);
    }
}
