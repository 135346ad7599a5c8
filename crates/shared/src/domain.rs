use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(InventionId);
id_newtype!(CommentId);
id_newtype!(ReviewId);
id_newtype!(GroupId);
id_newtype!(MessageId);
id_newtype!(SuggestionId);
id_newtype!(MentorshipRequestId);

/// Enumerations the backend stores as snake_case strings. Each one knows its
/// display label and the full variant list for pickers.
macro_rules! labeled_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technology,
    Engineering,
    Science,
    Health,
    Environment,
    Education,
    Art,
    #[serde(other)]
    Other,
}

labeled_enum!(Category {
    Technology => "Technology",
    Engineering => "Engineering",
    Science => "Science",
    Health => "Health",
    Environment => "Environment",
    Education => "Education",
    Art => "Art & Design",
    Other => "Other",
});

impl Category {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Engineering => "engineering",
            Category::Science => "science",
            Category::Health => "health",
            Category::Environment => "environment",
            Category::Education => "education",
            Category::Art => "art",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

labeled_enum!(Difficulty {
    Beginner => "Beginner",
    Intermediate => "Intermediate",
    Advanced => "Advanced",
    Expert => "Expert",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostRange {
    Low,
    Medium,
    High,
    VeryHigh,
}

labeled_enum!(CostRange {
    Low => "Under $100",
    Medium => "$100 - $1,000",
    High => "$1,000 - $10,000",
    VeryHigh => "Over $10,000",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStage {
    Idea,
    Concept,
    Prototype,
    Testing,
    Production,
}

labeled_enum!(DevelopmentStage {
    Idea => "Idea",
    Concept => "Concept",
    Prototype => "Prototype",
    Testing => "Testing",
    Production => "Production",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostVoted,
    HighestRated,
    MostViewed,
}

labeled_enum!(SortKey {
    Newest => "Newest",
    Oldest => "Oldest",
    MostVoted => "Most voted",
    HighestRated => "Highest rated",
    MostViewed => "Most viewed",
});

impl SortKey {
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::MostVoted => "most_voted",
            SortKey::HighestRated => "highest_rated",
            SortKey::MostViewed => "most_viewed",
        }
    }
}
