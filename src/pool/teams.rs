// Team-name normalization: maps alternate spellings and abbreviations to
// one canonical name so pick-vs-winner comparison is spelling-invariant.

/// Normalize a raw team name to its canonical spelling.
///
/// Known abbreviations, city short forms, nicknames, and relocated-franchise
/// names map to the current canonical full name. Unknown input passes
/// through trimmed but otherwise verbatim, so two records using the same
/// unrecognized spelling still compare equal. Total function; never fails.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match canonical(trimmed) {
        Some(name) => name.to_string(),
        None => trimmed.to_string(),
    }
}

/// Look up the canonical name for a known spelling. Matching is
/// case-insensitive. Returns `None` for unrecognized input.
fn canonical(name: &str) -> Option<&'static str> {
    let key = name.to_lowercase();
    let canon = match key.as_str() {
        "arizona cardinals" | "ari" | "arizona" | "cardinals" => "Arizona Cardinals",
        "atlanta falcons" | "atl" | "atlanta" | "falcons" => "Atlanta Falcons",
        "baltimore ravens" | "bal" | "baltimore" | "ravens" => "Baltimore Ravens",
        "buffalo bills" | "buf" | "buffalo" | "bills" => "Buffalo Bills",
        "carolina panthers" | "car" | "carolina" | "panthers" => "Carolina Panthers",
        "chicago bears" | "chi" | "chicago" | "bears" => "Chicago Bears",
        "cincinnati bengals" | "cin" | "cincinnati" | "bengals" => "Cincinnati Bengals",
        "cleveland browns" | "cle" | "cleveland" | "browns" => "Cleveland Browns",
        "dallas cowboys" | "dal" | "dallas" | "cowboys" => "Dallas Cowboys",
        "denver broncos" | "den" | "denver" | "broncos" => "Denver Broncos",
        "detroit lions" | "det" | "detroit" | "lions" => "Detroit Lions",
        "green bay packers" | "gb" | "green bay" | "packers" => "Green Bay Packers",
        "houston texans" | "hou" | "houston" | "texans" => "Houston Texans",
        "indianapolis colts" | "ind" | "indianapolis" | "colts" => "Indianapolis Colts",
        "jacksonville jaguars" | "jax" | "jac" | "jacksonville" | "jaguars" => {
            "Jacksonville Jaguars"
        }
        "kansas city chiefs" | "kc" | "kansas city" | "chiefs" => "Kansas City Chiefs",
        "las vegas raiders" | "lv" | "las vegas" | "raiders" | "oakland raiders" => {
            "Las Vegas Raiders"
        }
        "los angeles chargers" | "lac" | "la chargers" | "chargers" | "san diego chargers" => {
            "Los Angeles Chargers"
        }
        "los angeles rams" | "lar" | "la rams" | "rams" | "st. louis rams" | "st louis rams" => {
            "Los Angeles Rams"
        }
        "miami dolphins" | "mia" | "miami" | "dolphins" => "Miami Dolphins",
        "minnesota vikings" | "min" | "minnesota" | "vikings" => "Minnesota Vikings",
        "new england patriots" | "ne" | "new england" | "patriots" => "New England Patriots",
        "new orleans saints" | "no" | "new orleans" | "saints" => "New Orleans Saints",
        "new york giants" | "nyg" | "ny giants" | "giants" => "New York Giants",
        "new york jets" | "nyj" | "ny jets" | "jets" => "New York Jets",
        "philadelphia eagles" | "phi" | "philadelphia" | "eagles" => "Philadelphia Eagles",
        "pittsburgh steelers" | "pit" | "pittsburgh" | "steelers" => "Pittsburgh Steelers",
        "san francisco 49ers" | "sf" | "san francisco" | "49ers" | "niners" => {
            "San Francisco 49ers"
        }
        "seattle seahawks" | "sea" | "seattle" | "seahawks" => "Seattle Seahawks",
        "tampa bay buccaneers" | "tb" | "tampa bay" | "buccaneers" | "bucs" => {
            "Tampa Bay Buccaneers"
        }
        "tennessee titans" | "ten" | "tennessee" | "titans" => "Tennessee Titans",
        "washington commanders" | "was" | "wsh" | "washington" | "commanders"
        | "washington football team" | "washington redskins" => "Washington Commanders",
        _ => return None,
    };
    Some(canon)
}
