//! Random visitor display names.

use pk_core::AgentRng;

const FIRST_NAMES: &[&str] = &[
    "Emma", "Mason", "Olivia", "Liam", "Ava", "Noah", "Sophia", "Jackson", "Isabella", "Aiden",
    "Mia", "Lucas", "Amelia", "Caleb", "Harper", "Benjamin", "Evelyn", "Samuel", "Abigail", "Henry",
    "Emily", "Wyatt", "Scarlett", "Andrew", "Madison", "Gabriel", "Chloe", "Owen", "Grace", "Levi",
    "Lily", "James", "Aria", "Isaac", "Riley",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia", "Martinez",
    "Robinson", "Clark", "Rodriguez", "Lewis", "Lee", "Walker", "Hall", "Allen", "Young", "Hernandez",
    "King", "Wright", "Lopez", "Hill", "Scott", "Green", "Adams", "Baker", "Gonzalez", "Nelson",
    "Carter", "Mitchell", "Perez", "Roberts", "Turner", "Phillips", "Campbell", "Parker", "Evans",
    "Edwards", "Collins", "Stewart", "Sanchez", "Morris", "Rogers", "Reed", "Cook", "Morgan", "Bell",
    "Murphy", "Bailey", "Rivera", "Cooper", "Richardson", "Cox", "Howard", "Ward",
];

/// "First Last", drawn from the visitor's own RNG.
pub fn random_name(rng: &mut AgentRng) -> String {
    let first = rng.choose(FIRST_NAMES).copied().unwrap_or("Guest");
    let last = rng.choose(LAST_NAMES).copied().unwrap_or("Visitor");
    format!("{first} {last}")
}
