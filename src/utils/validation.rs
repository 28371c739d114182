use crate::error::Result;
use validator::Validate;

pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate()?;
    Ok(())
}
