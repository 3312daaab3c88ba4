use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DotfError {
    #[error("cannot normalize the {0}: its peak value is {1}")]
    Normalization(&'static str, f64),
    #[error("the poke center ({0},{1}) is outside the {2}x{2} grid")]
    PokeOutOfBounds(isize, isize, usize),
    #[error("cannot unwrap a phase map with non-finite values")]
    NonFinitePhase,
    #[error("map size mismatch: expected {0:?}, found {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),
    #[error("the {0} mask does not select any pixel")]
    EmptyMask(&'static str),
    #[error("cannot build `::dotf::Dotf`")]
    Builder(#[from] DotfBuilderError),
    #[error("cannot create the pickle file: {1}")]
    Dump(#[source] std::io::Error, PathBuf),
    #[error("cannot serialize the maps into pickle")]
    Pickle(#[from] serde_pickle::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DotfBuilderError {
    #[error("cannot open `::dotf::DotfBuilder` toml file: {1}")]
    Open(#[source] std::io::Error, PathBuf),
    #[error("cannot create `::dotf::DotfBuilder` toml file: {1}")]
    Create(#[source] std::io::Error, PathBuf),
    #[error("cannot read `::dotf::DotfBuilder` toml file: {1}")]
    Read(#[source] std::io::Error, PathBuf),
    #[error("cannot write `::dotf::DotfBuilder` toml file: {1}")]
    Write(#[source] std::io::Error, PathBuf),
    #[error("cannot deserialize `::dotf::DotfBuilder` from toml")]
    Load(#[from] toml::de::Error),
    #[error("cannot serialize `::dotf::DotfBuilder` into toml")]
    Save(#[from] toml::ser::Error),
}
