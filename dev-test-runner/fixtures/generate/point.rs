impl ::std::fmt::Display for Point {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        write!(f, "X: {}, ", self.X)?;
        write!(f, "Y: {}, ", self.Y)?;
        Ok(())
    }
}
