//! Named field maps for rendering and offline analysis

use serde::Serialize;
use std::{fs::File, path::Path};

use crate::{DotfError, Map, Result};

/// A named 2D map with its samples in row-major order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMap {
    pub name: String,
    pub title: String,
    /// `(rows, columns)`
    pub shape: (usize, usize),
    pub data: Vec<f64>,
    /// `[x_first, x_last, y_first, y_last]` coordinates
    pub extent: Option<[f64; 4]>,
}
impl FieldMap {
    pub fn new(name: &str, title: &str, map: &Map) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            shape: map.shape(),
            // nalgebra stores the columns contiguously
            data: map.transpose().as_slice().to_vec(),
            extent: None,
        }
    }
    /// Sets the map coordinates
    pub fn extent(self, extent: [f64; 4]) -> Self {
        Self {
            extent: Some(extent),
            ..self
        }
    }
    /// Keeps the samples with both coordinates within `[-limit,limit]`
    ///
    /// A map without coordinates is returned unchanged
    pub fn zoom(self, limit: f64) -> Self {
        let Some([x0, x1, y0, y1]) = self.extent else {
            return self;
        };
        let (n_rows, n_cols) = self.shape;
        let axis = |first: f64, last: f64, n: usize| -> Vec<usize> {
            let step = if n > 1 {
                (last - first) / (n - 1) as f64
            } else {
                0.
            };
            (0..n)
                .filter(|&k| (first + k as f64 * step).abs() <= limit)
                .collect()
        };
        let cols = axis(x0, x1, n_cols);
        let rows = axis(y0, y1, n_rows);
        let (Some(&c0), Some(&c1), Some(&r0), Some(&r1)) =
            (cols.first(), cols.last(), rows.first(), rows.last())
        else {
            return self;
        };
        let data = rows
            .iter()
            .flat_map(|&i| cols.iter().map(move |&j| (i, j)))
            .map(|(i, j)| self.data[i * n_cols + j])
            .collect();
        let coordinate = |first: f64, last: f64, n: usize, k: usize| {
            first + k as f64 * (last - first) / (n.max(2) - 1) as f64
        };
        Self {
            shape: (rows.len(), cols.len()),
            data,
            extent: Some([
                coordinate(x0, x1, n_cols, c0),
                coordinate(x0, x1, n_cols, c1),
                coordinate(y0, y1, n_rows, r0),
                coordinate(y0, y1, n_rows, r1),
            ]),
            ..self
        }
    }
    /// Returns the x and y axis labels
    ///
    /// The x label starts with the map title, both labels give the coordinate range in meters or
    /// in pixels for a map without coordinates
    pub fn axis_labels(&self) -> (String, String) {
        match self.extent {
            Some([x0, x1, y0, y1]) => (
                format!("{}: x [{:.3e}m, {:.3e}m]", self.title, x0, x1),
                format!("y [{:.3e}m, {:.3e}m]", y0, y1),
            ),
            None => (
                format!("{}: x [{}px]", self.title, self.shape.1),
                format!("y [{}px]", self.shape.0),
            ),
        }
    }
    /// Returns the sample at row `i` and column `j`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let (n_rows, n_cols) = self.shape;
        (i < n_rows && j < n_cols).then(|| self.data[i * n_cols + j])
    }
}

/// Collection of [FieldMap]
#[derive(Debug, Clone, Default, Serialize)]
pub struct Maps(Vec<FieldMap>);
impl Maps {
    pub fn push(&mut self, map: FieldMap) -> &mut Self {
        self.0.push(map);
        self
    }
    pub fn get(&self, name: &str) -> Option<&FieldMap> {
        self.0.iter().find(|map| map.name == name)
    }
    pub fn iter(&self) -> impl Iterator<Item = &FieldMap> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Writes all the maps into a pickle file
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file =
            File::create(&path).map_err(|e| DotfError::Dump(e, path.as_ref().to_path_buf()))?;
        serde_pickle::to_writer(&mut file, self, serde_pickle::SerOptions::new())?;
        log::info!("maps saved to {}", path.as_ref().display());
        Ok(())
    }
    /// Renders each map into `<dir>/<name>.png`
    #[cfg(feature = "plot")]
    pub fn heatmaps<P: AsRef<Path>>(&self, dir: P) {
        for map in self.iter() {
            let path = dir.as_ref().join(&map.name).with_extension("png");
            let filename = format!("{}", path.display());
            let (xlabel, ylabel) = map.axis_labels();
            let config = complot::Config::new()
                .filename(filename.as_str())
                .xaxis(complot::Axis::new().label(xlabel.as_str()))
                .yaxis(complot::Axis::new().label(ylabel.as_str()));
            let _: complot::Heatmap = ((map.data.as_slice(), map.shape), Some(config)).into();
            log::info!("{} rendered into {}", map.title, filename);
        }
    }
}
impl<'a> IntoIterator for &'a Maps {
    type Item = &'a FieldMap;
    type IntoIter = std::slice::Iter<'a, FieldMap>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major() {
        let map = Map::from_fn(2, 3, |i, j| (10 * i + j) as f64);
        let field = FieldMap::new("m", "map", &map);
        assert_eq!(field.data, vec![0., 1., 2., 10., 11., 12.]);
        assert_eq!(field.get(1, 2), Some(12.));
        assert_eq!(field.get(2, 0), None);
    }

    #[test]
    fn zoom() {
        let map = Map::from_fn(8, 8, |i, j| (10 * i + j) as f64);
        let field = FieldMap::new("m", "map", &map)
            .extent([-4., 3., -4., 3.])
            .zoom(1.5);
        assert_eq!(field.shape, (3, 3));
        assert_eq!(field.extent, Some([-1., 1., -1., 1.]));
        assert_eq!(field.get(0, 0), Some(33.));
        assert_eq!(field.get(2, 2), Some(55.));
    }

    #[test]
    fn labels() {
        let map = Map::zeros(4, 6);
        let field = FieldMap::new("m", "Residual", &map);
        assert_eq!(
            field.axis_labels(),
            ("Residual: x [6px]".to_string(), "y [4px]".to_string())
        );
        let (xlabel, ylabel) = field.extent([-0.5, 0.5, -0.25, 0.25]).axis_labels();
        assert_eq!(xlabel, "Residual: x [-5.000e-1m, 5.000e-1m]");
        assert_eq!(ylabel, "y [-2.500e-1m, 2.500e-1m]");
    }

    #[test]
    fn zoom_without_extent() {
        let map = Map::zeros(4, 4);
        let field = FieldMap::new("m", "map", &map).zoom(0.1);
        assert_eq!(field.shape, (4, 4));
    }

    #[test]
    fn dump() {
        let mut maps = Maps::default();
        maps.push(FieldMap::new("a", "A", &Map::zeros(2, 2)))
            .push(FieldMap::new("b", "B", &Map::from_element(3, 3, 1.)));
        assert_eq!(maps.len(), 2);
        assert_eq!(maps.get("b").map(|m| m.shape), Some((3, 3)));
        let path = std::env::temp_dir().join("dotf-maps-dump.pkl");
        maps.dump(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(path).unwrap();
    }
}
