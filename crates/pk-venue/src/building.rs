//! Building variants.
//!
//! The variant set is closed, so a building is a shared [`BuildingBase`]
//! record plus a [`Facility`] enum dispatched with `match`.

use std::fmt;
use std::str::FromStr;

use pk_core::{Direction, GridPos, ParkConfig, SimRng, Tick, VisualHandle};

use crate::{Attraction, Concession, Release, VenueError, VenueResult};

// ── BuildingKind ──────────────────────────────────────────────────────────────

/// Type tag of a building.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BuildingKind {
    Road,
    Entrance,
    Attraction,
    Concession,
    /// Inert scenery; only tracks road access.
    Placeholder,
}

impl BuildingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildingKind::Road        => "road",
            BuildingKind::Entrance    => "entrance",
            BuildingKind::Attraction  => "attraction",
            BuildingKind::Concession  => "concession",
            BuildingKind::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingKind {
    type Err = VenueError;

    /// Accepts the canonical names plus the `ride`/`stand` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "road"                  => Ok(BuildingKind::Road),
            "entrance"              => Ok(BuildingKind::Entrance),
            "attraction" | "ride"   => Ok(BuildingKind::Attraction),
            "concession" | "stand"  => Ok(BuildingKind::Concession),
            "placeholder"           => Ok(BuildingKind::Placeholder),
            other                   => Err(VenueError::UnknownKind(other.to_string())),
        }
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// Shape of a road tile, derived from which neighbours are roads.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RoadStyle {
    #[default]
    Isolated,
    End,
    Straight,
    Corner,
    Tee,
    Cross,
}

impl RoadStyle {
    /// Style and rotation (degrees) for a neighbour mask built from
    /// [`Direction::bit`].  Rotation 0 means: `End` opens north, `Straight`
    /// runs north–south, `Corner` joins north and east, `Tee` lacks south.
    pub fn from_mask(mask: u8) -> (RoadStyle, u16) {
        let n = Direction::North.bit();
        let e = Direction::East.bit();
        let s = Direction::South.bit();
        let w = Direction::West.bit();
        let mask = mask & 0b1111;

        match mask.count_ones() {
            0 => (RoadStyle::Isolated, 0),
            1 => {
                let rot = if mask == n { 0 } else if mask == e { 90 } else if mask == s { 180 } else { 270 };
                (RoadStyle::End, rot)
            }
            2 if mask == n | s => (RoadStyle::Straight, 0),
            2 if mask == e | w => (RoadStyle::Straight, 90),
            2 => {
                let rot = if mask == n | e {
                    0
                } else if mask == e | s {
                    90
                } else if mask == s | w {
                    180
                } else {
                    270
                };
                (RoadStyle::Corner, rot)
            }
            3 => {
                let missing = !mask & 0b1111;
                let rot = if missing == s { 0 } else if missing == w { 90 } else if missing == n { 180 } else { 270 };
                (RoadStyle::Tee, rot)
            }
            _ => (RoadStyle::Cross, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadStyle::Isolated => "isolated",
            RoadStyle::End      => "end",
            RoadStyle::Straight => "straight",
            RoadStyle::Corner   => "corner",
            RoadStyle::Tee      => "tee",
            RoadStyle::Cross    => "cross",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Road {
    pub style: RoadStyle,
    pub cost:  f64,
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Fields shared by every variant.
#[derive(Clone, Debug)]
pub struct BuildingBase {
    pub pos:             GridPos,
    /// Empty for roads, entrances and placeholders.
    pub subtype:         String,
    /// Degrees, one of 0/90/180/270.
    pub rotation:        u16,
    /// Refreshed every tick and on every neighbouring topology change.
    pub has_road_access: bool,
    pub built_at:        Tick,
    pub visual:          VisualHandle,
}

/// Variant-specific state.
#[derive(Clone, Debug)]
pub enum Facility {
    Road(Road),
    Entrance,
    Attraction(Attraction),
    Concession(Concession),
    Placeholder,
}

#[derive(Clone, Debug)]
pub struct Building {
    pub base:     BuildingBase,
    pub facility: Facility,
}

impl Building {
    /// Construct a building of `kind` at `pos`.
    ///
    /// An empty `subtype` for an attraction or concession picks a random
    /// configured subtype.  Zones get a random quarter-turn rotation.
    pub fn new(
        kind:    BuildingKind,
        subtype: &str,
        pos:     GridPos,
        now:     Tick,
        config:  &ParkConfig,
        rng:     &mut SimRng,
        visual:  VisualHandle,
    ) -> VenueResult<Building> {
        let (subtype, facility) = match kind {
            BuildingKind::Road => {
                let road = Road { style: RoadStyle::Isolated, cost: config.road.cost_per_tile };
                (String::new(), Facility::Road(road))
            }
            BuildingKind::Entrance => (String::new(), Facility::Entrance),
            BuildingKind::Placeholder => (String::new(), Facility::Placeholder),
            BuildingKind::Attraction => {
                let name = resolve_subtype(kind, subtype, config.attraction.subtypes.keys(), rng)?;
                let spec = config
                    .attraction(&name)
                    .cloned()
                    .ok_or_else(|| VenueError::UnknownSubtype { kind, subtype: name.clone() })?;
                (name.clone(), Facility::Attraction(Attraction::new(name, spec, now)))
            }
            BuildingKind::Concession => {
                let name = resolve_subtype(kind, subtype, config.concession.subtypes.keys(), rng)?;
                let spec = config
                    .concession(&name)
                    .cloned()
                    .ok_or_else(|| VenueError::UnknownSubtype { kind, subtype: name.clone() })?;
                (name.clone(), Facility::Concession(Concession::new(name, spec, now)))
            }
        };

        let rotation = match facility {
            Facility::Road(_) => 0,
            _ => 90 * rng.gen_range(0..4u16),
        };

        Ok(Building {
            base: BuildingBase {
                pos,
                subtype,
                rotation,
                has_road_access: false,
                built_at: now,
                visual,
            },
            facility,
        })
    }

    pub fn kind(&self) -> BuildingKind {
        match self.facility {
            Facility::Road(_)       => BuildingKind::Road,
            Facility::Entrance      => BuildingKind::Entrance,
            Facility::Attraction(_) => BuildingKind::Attraction,
            Facility::Concession(_) => BuildingKind::Concession,
            Facility::Placeholder   => BuildingKind::Placeholder,
        }
    }

    #[inline]
    pub fn is_road(&self) -> bool {
        matches!(self.facility, Facility::Road(_))
    }

    #[inline]
    pub fn is_entrance(&self) -> bool {
        matches!(self.facility, Facility::Entrance)
    }

    pub fn as_attraction(&self) -> Option<&Attraction> {
        match &self.facility {
            Facility::Attraction(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_attraction_mut(&mut self) -> Option<&mut Attraction> {
        match &mut self.facility {
            Facility::Attraction(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_concession(&self) -> Option<&Concession> {
        match &self.facility {
            Facility::Concession(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_concession_mut(&mut self) -> Option<&mut Concession> {
        match &mut self.facility {
            Facility::Concession(c) => Some(c),
            _ => None,
        }
    }

    pub fn road_style(&self) -> Option<RoadStyle> {
        match &self.facility {
            Facility::Road(r) => Some(r.style),
            _ => None,
        }
    }

    /// Recompute a road's style and rotation from its road-neighbour mask.
    /// No-op for other variants.
    pub fn set_road_mask(&mut self, mask: u8) {
        if let Facility::Road(road) = &mut self.facility {
            let (style, rotation) = RoadStyle::from_mask(mask);
            road.style = style;
            self.base.rotation = rotation;
        }
    }

    /// One simulation step.  `has_road_access` is the freshly computed road
    /// check for this tile.
    pub fn step(&mut self, now: Tick, has_road_access: bool) -> Vec<Release> {
        self.base.has_road_access = has_road_access;
        let pos = self.base.pos;
        match &mut self.facility {
            Facility::Attraction(a) => a.step(now, pos),
            Facility::Concession(c) => c.step(now, pos),
            Facility::Road(_) | Facility::Entrance | Facility::Placeholder => Vec::new(),
        }
    }

    /// Tear-down hook; hands back every visitor still inside.
    pub fn dispose(&mut self) -> Vec<Release> {
        let pos = self.base.pos;
        match &mut self.facility {
            Facility::Attraction(a) => a.dispose(pos),
            Facility::Concession(c) => c.dispose(pos),
            Facility::Road(_) | Facility::Entrance | Facility::Placeholder => Vec::new(),
        }
    }

    /// Up-front cost (road tile price or installation cost).
    pub fn fixed_cost(&self) -> f64 {
        match &self.facility {
            Facility::Road(r)       => r.cost,
            Facility::Attraction(a) => a.spec.installation_cost,
            Facility::Concession(c) => c.spec.installation_cost,
            Facility::Entrance | Facility::Placeholder => 0.0,
        }
    }

    /// Fixed plus accrued operating cost as of the last step.
    pub fn total_cost(&self) -> f64 {
        match &self.facility {
            Facility::Road(r)       => r.cost,
            Facility::Attraction(a) => a.cost,
            Facility::Concession(c) => c.cost,
            Facility::Entrance | Facility::Placeholder => 0.0,
        }
    }

    pub fn revenue(&self) -> f64 {
        match &self.facility {
            Facility::Attraction(a) => a.revenue,
            Facility::Concession(c) => c.revenue,
            _ => 0.0,
        }
    }
}

/// Pick the configured subtype for `requested`, or a random one when empty.
fn resolve_subtype<'a>(
    kind:      BuildingKind,
    requested: &str,
    known:     impl ExactSizeIterator<Item = &'a String>,
    rng:       &mut SimRng,
) -> VenueResult<String> {
    if !requested.is_empty() {
        return Ok(requested.to_string());
    }
    let names: Vec<&String> = known.collect();
    let i = rng.pick_index(names.len()).ok_or(VenueError::NoSubtypes(kind))?;
    Ok(names[i].clone())
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind(), self.base.pos)?;
        if !self.base.has_road_access && !self.is_road() {
            f.write_str(" (no road access)")?;
        }
        match &self.facility {
            Facility::Road(r)       => write!(f, ": {} road", r.style.as_str()),
            Facility::Attraction(a) => write!(f, ": {a}"),
            Facility::Concession(c) => write!(f, ": {c}"),
            Facility::Entrance | Facility::Placeholder => Ok(()),
        }
    }
}
