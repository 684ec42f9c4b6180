use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Returned by `FromStr` when a value is not part of a fixed option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a known {}", self.value, self.kind)
    }
}

impl std::error::Error for UnknownOption {}

macro_rules! option_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every option in the order the form offers them; the first is the default.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownOption {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum!(Degree, "degree", {
    Ug => "UG",
    Pg => "PG",
});

option_enum!(Domain, "domain", {
    Be => "BE",
    BTech => "BTech",
    Bsc => "Bsc",
    Bba => "BBA",
    Bca => "BCA",
    Mca => "MCA",
    Msc => "Msc",
    Other => "Other",
});

option_enum!(YearOfPassingOut, "year of passing out", {
    Y2024 => "2024",
    Y2025 => "2025",
    Y2026 => "2026",
    Y2027 => "2027",
});

option_enum!(District, "district", {
    Ariyalur => "Ariyalur",
    Chennai => "Chennai",
    Coimbatore => "Coimbatore",
    Cuddalore => "Cuddalore",
    Dharmapuri => "Dharmapuri",
    Dindigul => "Dindigul",
    Erode => "Erode",
    Kanchipuram => "Kanchipuram",
    Kanyakumari => "Kanyakumari",
    Karur => "Karur",
    Krishnagiri => "Krishnagiri",
    Madurai => "Madurai",
    Nagapattinam => "Nagapattinam",
    Namakkal => "Namakkal",
    Nilgiris => "Nilgiris",
    Perambalur => "Perambalur",
    Pudukkottai => "Pudukkottai",
    Ramanathapuram => "Ramanathapuram",
    Salem => "Salem",
    Sivaganga => "Sivaganga",
    Thanjavur => "Thanjavur",
    Theni => "Theni",
    Thoothukudi => "Thoothukudi (Tuticorin)",
    Tiruchirappalli => "Tiruchirappalli",
    Tirunelveli => "Tirunelveli",
    Tiruppur => "Tiruppur",
    Tiruvallur => "Tiruvallur",
    Tiruvannamalai => "Tiruvannamalai",
    Tiruvarur => "Tiruvarur",
    Vellore => "Vellore",
    Viluppuram => "Viluppuram",
    Virudhunagar => "Virudhunagar",
});

/// Number of columns a registration occupies in the record store.
pub const ROW_WIDTH: usize = 9;

/// A registrant that passed the schema. Only `schema::validate` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) contact: String,
    pub(crate) college: String,
    pub(crate) degree: Degree,
    pub(crate) domain: Domain,
    pub(crate) year_of_passing_out: YearOfPassingOut,
    pub(crate) location: District,
}

impl RegistrationRecord {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn college(&self) -> &str {
        &self.college
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn year_of_passing_out(&self) -> YearOfPassingOut {
        self.year_of_passing_out
    }

    pub fn location(&self) -> District {
        self.location
    }

    /// The row appended to the sheet. Column order is fixed and must match the
    /// sheet's header: firstName, lastName, email, contact, college, degree,
    /// domain, yearOfPassingOut, location.
    pub fn to_row(&self) -> [String; ROW_WIDTH] {
        [
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.contact.clone(),
            self.college.clone(),
            self.degree.as_str().to_string(),
            self.domain.as_str().to_string(),
            self.year_of_passing_out.as_str().to_string(),
            self.location.as_str().to_string(),
        ]
    }
}
