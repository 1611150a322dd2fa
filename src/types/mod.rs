pub mod city_record;
pub mod gazetteer_city;
pub mod lat_lon;
pub mod weather_variable;
