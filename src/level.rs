//! Level geometry: platforms, walls and the goal, plus the line-oriented level file format.
//!
//! A level file holds one platform per line as `x,y,width`. The legacy `x,y,width,height` form
//! is accepted but its height is ignored; every authored platform is
//! [HOPPER_PLATFORM_HEIGHT] tall. Blank lines and lines starting with `#` are ignored, and
//! malformed lines are skipped.

use crate::{
    constants::{
        HOPPER_GOAL_HEIGHT, HOPPER_GOAL_WIDTH, HOPPER_GROUND_HEIGHT, HOPPER_GROUND_WIDTH,
        HOPPER_GROUND_X, HOPPER_PLATFORM_HEIGHT, HOPPER_WALL_WIDTH,
    },
    error::LevelError,
    geometry::Aabb,
};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// the synthetic starting ground
    Ground,
    /// a synthetic boundary; never landable, blocks horizontal movement
    Wall,
    /// authored in a level file
    Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub aabb: Aabb,
    pub kind: PlatformKind,
}

impl Platform {
    pub const fn new(aabb: Aabb, kind: PlatformKind) -> Self {
        Self { aabb, kind }
    }

    #[inline]
    pub fn landable(&self) -> bool {
        !matches!(self.kind, PlatformKind::Wall)
    }

    #[inline]
    pub fn blocks_horizontal(&self) -> bool {
        matches!(self.kind, PlatformKind::Wall)
    }
}

/// Static geometry for one run. Platform order is load order, synthetic furniture first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    platforms: Vec<Platform>,
    goal: Option<Aabb>,
}

impl Level {
    /// A level with no geometry at all; anything placed in it free-falls
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(platforms: Vec<Platform>, goal: Option<Aabb>) -> Self {
        Self { platforms, goal }
    }

    /// Surround authored platforms with the starting ground and boundary walls, and place the
    /// goal centered above the last authored platform
    pub fn generate(authored: Vec<Aabb>, screen_height: f64) -> Self {
        let ground = Aabb::new(
            HOPPER_GROUND_X,
            screen_height - HOPPER_GROUND_HEIGHT,
            HOPPER_GROUND_WIDTH,
            HOPPER_GROUND_HEIGHT,
        );
        let ledge_wall = Aabb::new(ground.right(), ground.top(), HOPPER_WALL_WIDTH, ground.height);
        let left_wall = Aabb::new(
            ground.left() - HOPPER_WALL_WIDTH,
            0.,
            HOPPER_WALL_WIDTH,
            screen_height,
        );

        let goal = authored.last().map(|target| {
            Aabb::new(
                target.x + ((target.width - HOPPER_GOAL_WIDTH) / 2.).floor(),
                target.y - HOPPER_GOAL_HEIGHT,
                HOPPER_GOAL_WIDTH,
                HOPPER_GOAL_HEIGHT,
            )
        });

        let mut platforms = Vec::with_capacity(authored.len() + 3);
        platforms.push(Platform::new(ground, PlatformKind::Ground));
        platforms.push(Platform::new(ledge_wall, PlatformKind::Wall));
        platforms.push(Platform::new(left_wall, PlatformKind::Wall));
        platforms.extend(
            authored
                .into_iter()
                .map(|aabb| Platform::new(aabb, PlatformKind::Platform)),
        );

        Self { platforms, goal }
    }

    pub fn parse(src: &str, screen_height: f64) -> Self {
        Self::generate(parse_platforms(src), screen_height)
    }

    /// Load a level file. A missing or unreadable file degrades to a level with only the
    /// synthetic furniture and no goal.
    pub fn load<P: AsRef<Path>>(path: P, screen_height: f64) -> Self {
        let authored = read_platforms(path).unwrap_or_else(|err| {
            tracing::warn!(%err, "no authored platforms loaded");
            Vec::new()
        });
        Self::generate(authored, screen_height)
    }

    #[inline]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    #[inline]
    pub fn goal(&self) -> Option<&Aabb> {
        self.goal.as_ref()
    }

    /// The first surface an agent can stand on
    pub fn spawn_platform(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.landable())
    }
}

/// Parse authored platforms out of level text, skipping anything malformed
pub fn parse_platforms(src: &str) -> Vec<Aabb> {
    src.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            let fields = line
                .split(',')
                .map(|field| field.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>();

            match fields.as_deref() {
                Ok(&[x, y, width]) => Some(authored(x, y, width)),
                Ok(&[x, y, width, _]) => {
                    tracing::warn!(
                        line = idx + 1,
                        "legacy x,y,width,height line, height replaced by the fixed platform height"
                    );
                    Some(authored(x, y, width))
                }
                Ok(fields) => {
                    tracing::warn!(
                        line = idx + 1,
                        found = fields.len(),
                        content = line,
                        "skipping line, expected x,y,width"
                    );
                    None
                }
                Err(err) => {
                    tracing::warn!(line = idx + 1, %err, content = line, "skipping line");
                    None
                }
            }
        })
        .collect()
}

fn authored(x: i64, y: i64, width: i64) -> Aabb {
    Aabb::new(x as f64, y as f64, width as f64, HOPPER_PLATFORM_HEIGHT)
}

pub fn read_platforms<P: AsRef<Path>>(path: P) -> Result<Vec<Aabb>, LevelError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LevelError::NotFound(path.to_path_buf()),
        _ => LevelError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(parse_platforms(&src))
}
