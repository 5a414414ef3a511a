//! Map description text format.
//!
//! ```text
//! SIZEX[6];SIZEY[4];TURNLIMIT[20];HPTHRESHOLD[5];UNITNUMRED[1];UNITNUMBLUE[1];
//! MAP[0,0,0,0,0,0];
//! MAP[0,1,1,3,1,0];
//! MAP[0,1,4,1,1,0];
//! MAP[0,0,0,0,0,0];
//! UNIT[1,1,infantry,0,10,0];
//! UNIT[4,2,panzer,1,10,0];
//! ```
//!
//! Records are `TAG[content]` separated by `;`; line breaks and surrounding
//! whitespace are ignored. `MAP` rows are listed top to bottom (row index is
//! `y`). `UNIT` fields are `x,y,type,team,hp,acted`; unit ids follow the
//! order of the `UNIT` records.

use std::path::Path;

use super::board::Board;
use super::error::MapError;
use super::grid::Pos;
use super::spec::UnitType;
use super::team::{Team, TeamPair};
use super::terrain::Terrain;

struct Header {
    width: Option<usize>,
    height: Option<usize>,
    turn_limit: Option<u32>,
    hp_threshold: Option<u32>,
    unit_num: TeamPair<Option<usize>>,
}

struct UnitRecord {
    pos: Pos,
    kind: UnitType,
    team: Team,
    hp: u8,
    acted: bool,
}

fn split_record(record: &str) -> Result<(&str, &str), MapError> {
    let open = record
        .find('[')
        .ok_or_else(|| MapError::MalformedRecord(record.to_string()))?;
    let content = record[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| MapError::MalformedRecord(record.to_string()))?;
    Ok((record[..open].trim(), content))
}

fn parse_num<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, MapError> {
    value.trim().parse().map_err(|_| MapError::InvalidNumber {
        field: field.to_string(),
        value: value.trim().to_string(),
    })
}

fn parse_row(content: &str) -> Result<Vec<Terrain>, MapError> {
    content
        .split(',')
        .map(|code| {
            let code: u8 = parse_num("MAP", code)?;
            Terrain::from_code(code).ok_or(MapError::UnknownTerrain(code))
        })
        .collect()
}

fn parse_unit(content: &str) -> Result<UnitRecord, MapError> {
    let fields: Vec<&str> = content.split(',').map(str::trim).collect();
    let [x, y, kind, team, hp, acted] = fields.as_slice() else {
        return Err(MapError::MalformedRecord(format!("UNIT[{content}]")));
    };
    let kind = UnitType::from_name(kind).ok_or_else(|| MapError::UnknownUnitType(kind.to_string()))?;
    let team = parse_num::<usize>("UNIT team", team)
        .ok()
        .and_then(Team::from_index)
        .ok_or_else(|| MapError::InvalidTeam(team.to_string()))?;
    let acted = match *acted {
        "0" | "false" => false,
        "1" | "true" => true,
        other => {
            return Err(MapError::InvalidNumber {
                field: "UNIT acted".to_string(),
                value: other.to_string(),
            })
        }
    };
    Ok(UnitRecord {
        pos: Pos::new(parse_num("UNIT x", x)?, parse_num("UNIT y", y)?),
        kind,
        team,
        hp: parse_num("UNIT hp", hp)?,
        acted,
    })
}

impl Board {
    /// Parse a map description.
    pub fn from_map_str(text: &str) -> Result<Self, MapError> {
        let mut header = Header {
            width: None,
            height: None,
            turn_limit: None,
            hp_threshold: None,
            unit_num: TeamPair::splat(None),
        };
        let mut rows: Vec<Vec<Terrain>> = Vec::new();
        let mut units: Vec<UnitRecord> = Vec::new();

        for record in text.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let (tag, content) = split_record(record)?;
            match tag.to_ascii_uppercase().as_str() {
                "SIZEX" => header.width = Some(parse_num("SIZEX", content)?),
                "SIZEY" => header.height = Some(parse_num("SIZEY", content)?),
                "TURNLIMIT" => header.turn_limit = Some(parse_num("TURNLIMIT", content)?),
                "HPTHRESHOLD" => header.hp_threshold = Some(parse_num("HPTHRESHOLD", content)?),
                "UNITNUMRED" => header.unit_num[Team::Red] = Some(parse_num("UNITNUMRED", content)?),
                "UNITNUMBLUE" => header.unit_num[Team::Blue] = Some(parse_num("UNITNUMBLUE", content)?),
                "MAP" => rows.push(parse_row(content)?),
                "UNIT" => units.push(parse_unit(content)?),
                _ => return Err(MapError::MalformedRecord(record.to_string())),
            }
        }

        let width = header.width.ok_or(MapError::MissingField("SIZEX"))?;
        let height = header.height.ok_or(MapError::MissingField("SIZEY"))?;
        let turn_limit = header.turn_limit.ok_or(MapError::MissingField("TURNLIMIT"))?;
        let hp_threshold = header.hp_threshold.ok_or(MapError::MissingField("HPTHRESHOLD"))?;
        let declared = TeamPair::new(
            header.unit_num[Team::Red].ok_or(MapError::MissingField("UNITNUMRED"))?,
            header.unit_num[Team::Blue].ok_or(MapError::MissingField("UNITNUMBLUE"))?,
        );

        if rows.len() != height {
            return Err(MapError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MapError::RowWidth {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        for team in Team::ALL {
            let found = units.iter().filter(|u| u.team == team).count();
            if found > declared[team] {
                return Err(MapError::UnitCountMismatch {
                    team,
                    declared: declared[team],
                    found,
                });
            }
        }

        let mut board = Board::with_terrain(width, height, rows.into_iter().flatten().collect())?
            .with_turn_limit(turn_limit)
            .with_hp_threshold(hp_threshold);
        for unit in units {
            let id = board.spawn_unit(unit.kind, unit.team, unit.pos, unit.hp)?;
            if unit.acted {
                board.set_acted(id, true);
            }
        }
        Ok(board)
    }

    /// Read and parse a map file.
    pub fn from_map_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_map_str(&text)
    }

    /// Write the board in map description format.
    ///
    /// Units are written in id order, so loading the result yields the same
    /// ids only when no slot is vacant.
    #[must_use]
    pub fn to_map_string(&self) -> String {
        let mut out = format!(
            "SIZEX[{}];SIZEY[{}];TURNLIMIT[{}];HPTHRESHOLD[{}];UNITNUMRED[{}];UNITNUMBLUE[{}];\n",
            self.width(),
            self.height(),
            self.turn_limit(),
            self.hp_threshold(),
            self.alive_count(Team::Red),
            self.alive_count(Team::Blue),
        );
        for y in 0..self.height() {
            let row: Vec<String> = (0..self.width())
                .map(|x| self.terrain_at(Pos::new(x, y)).code().to_string())
                .collect();
            out.push_str(&format!("MAP[{}];\n", row.join(",")));
        }
        for u in self.units() {
            out.push_str(&format!(
                "UNIT[{},{},{},{},{},{}];\n",
                u.pos.x,
                u.pos.y,
                u.kind,
                u.team.index(),
                u.hp,
                u8::from(u.acted)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "SIZEX[5];SIZEY[4];TURNLIMIT[12];HPTHRESHOLD[3];UNITNUMRED[2];UNITNUMBLUE[1];
        MAP[0,0,0,0,0];
        MAP[0,1,3,1,0];
        MAP[0,5,4,6,0];
        MAP[0,0,0,0,0];
        UNIT[1,1,infantry,0,10,0];
        UNIT[3,1,cannon,0,7,1];
        UNIT[2,2,panzer,1,10,0];";

    #[test]
    fn test_parse_small_map() {
        let board = Board::from_map_str(SMALL).unwrap();

        assert_eq!(board.width(), 5);
        assert_eq!(board.height(), 4);
        assert_eq!(board.turn_limit(), 12);
        assert_eq!(board.hp_threshold(), 3);
        assert_eq!(board.terrain_at(Pos::new(2, 1)), Terrain::Forest);
        assert_eq!(board.terrain_at(Pos::new(3, 2)), Terrain::Castle);
        assert_eq!(board.terrain_at(Pos::new(0, 0)), Terrain::Barrier);

        let cannon = board.unit_at(Pos::new(3, 1)).unwrap();
        assert_eq!(cannon.kind, UnitType::Cannon);
        assert_eq!(cannon.hp, 7);
        assert!(cannon.acted);

        let panzer = board.unit_at(Pos::new(2, 2)).unwrap();
        assert_eq!(panzer.team, Team::Blue);
        assert_eq!(panzer.id.0, 2);
    }

    #[test]
    fn test_roundtrip() {
        let board = Board::from_map_str(SMALL).unwrap();
        let text = board.to_map_string();
        let reparsed = Board::from_map_str(&text).unwrap();
        assert_eq!(board, reparsed);
    }

    #[test]
    fn test_missing_header() {
        let text = "SIZEX[3];SIZEY[1];TURNLIMIT[5];UNITNUMRED[0];UNITNUMBLUE[0];MAP[1,1,1];";
        assert!(matches!(
            Board::from_map_str(text),
            Err(MapError::MissingField("HPTHRESHOLD"))
        ));
    }

    #[test]
    fn test_row_mismatch() {
        let short_row = "SIZEX[3];SIZEY[2];TURNLIMIT[5];HPTHRESHOLD[0];UNITNUMRED[0];UNITNUMBLUE[0];
            MAP[1,1,1];MAP[1,1];";
        assert!(matches!(
            Board::from_map_str(short_row),
            Err(MapError::RowWidth { row: 1, expected: 3, found: 2 })
        ));

        let missing_row = "SIZEX[3];SIZEY[2];TURNLIMIT[5];HPTHRESHOLD[0];UNITNUMRED[0];UNITNUMBLUE[0];
            MAP[1,1,1];";
        assert!(matches!(
            Board::from_map_str(missing_row),
            Err(MapError::RowCount { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_bad_records() {
        let header = "SIZEX[2];SIZEY[1];TURNLIMIT[5];HPTHRESHOLD[0];UNITNUMRED[1];UNITNUMBLUE[1];MAP[1,1];";

        let bad_terrain = "SIZEX[2];SIZEY[1];TURNLIMIT[5];HPTHRESHOLD[0];UNITNUMRED[0];UNITNUMBLUE[0];MAP[1,9];";
        assert!(matches!(Board::from_map_str(bad_terrain), Err(MapError::UnknownTerrain(9))));

        let bad_kind = format!("{header}UNIT[0,0,dragon,0,10,0];");
        assert!(matches!(Board::from_map_str(&bad_kind), Err(MapError::UnknownUnitType(_))));

        let bad_team = format!("{header}UNIT[0,0,infantry,2,10,0];");
        assert!(matches!(Board::from_map_str(&bad_team), Err(MapError::InvalidTeam(_))));

        let overlap = format!("{header}UNIT[0,0,infantry,0,10,0];UNIT[0,0,infantry,1,10,0];");
        assert!(matches!(Board::from_map_str(&overlap), Err(MapError::CellOccupied(_))));

        let too_many = format!("{header}UNIT[0,0,infantry,0,10,0];UNIT[1,0,infantry,0,10,0];");
        assert!(matches!(
            Board::from_map_str(&too_many),
            Err(MapError::UnitCountMismatch { team: Team::Red, .. })
        ));

        assert!(matches!(
            Board::from_map_str("SIZEX 3;"),
            Err(MapError::MalformedRecord(_))
        ));
    }
}
