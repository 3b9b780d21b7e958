// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Utils: project root discovery for asset paths
//! and the quaternion trackball: trackball.rs

use std::{
    env,
    ffi::OsString,
    fs::read_dir,
    io::{self, ErrorKind},
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

mod trackball;
pub use trackball::*;

/// get flag_file path...
pub fn get_project_root(flag_file: &str) -> io::Result<PathBuf> {
    let path = env::current_dir()?;
    let mut path_ancestors = path.as_path().ancestors();

    while let Some(p) = path_ancestors.next() {
        let has_flag = read_dir(p)?
            .into_iter()
            .any(|p| p.unwrap().file_name() == OsString::from(flag_file));
        if has_flag {
            return Ok(PathBuf::from(p));
        }
    }
    Err(io::Error::new(
        ErrorKind::NotFound,
        "Ran out of places to find flag_file",
    ))
}

/// Gets the absolute path of the root of RustGlint. In fact, it looks for
/// where Cargo.lock locates, so demo binaries can find shaders and meshes
/// under the assets folder no matter which directory they run from.
pub fn get_glint_root_path() -> String {
    match get_project_root("Cargo.lock") {
        Ok(p) => {
            let s = format!("{:?}", p);
            s[1..s.len() - 1].to_string()
        }
        Err(_e) => ".".to_string(),
    }
}

pub fn get_abs_path(fpath: &str) -> String {
    if Path::new(fpath).is_relative() {
        format!("{}{}{}", get_glint_root_path(), MAIN_SEPARATOR, fpath)
    } else {
        fpath.to_string()
    }
}
