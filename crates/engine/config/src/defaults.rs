//! Template written when no rule file exists

/// Default rule file location, relative to the working directory
pub const DEFAULT_RULES_PATH: &str = "config/territorial-rules.toml";

/// Commented rule file with no active rules
pub const DEFAULT_RULES_FILE: &str = r##"# Territorial rules
#
# Controls where crops grow and animals breed, by biome, temperature,
# coordinates and dimension. With no rules, everything is allowed.

[settings]
plant_growth_control = true
animal_breeding_control = true
biome_control = true        # check biomes and temperature_min/max
coordinate_control = true   # check x/y/z ranges
debug_logging = false       # log every decision at info level
cache_capacity = 1000       # cached decisions (0 disables the cache)

# Rule fields (all optional)
#
#   enabled               true/false, default true
#   allow                 true allows the event, false blocks it; default true
#   biomes                biome patterns, empty matches every biome
#   temperature_min/max   inclusive, vanilla scale is about -0.7 to 2.0
#   x_min, x_max          inclusive block coordinates, same for y and z
#   dimensions            only these dimensions
#   dimensions_blacklist  every dimension except these (not with `dimensions`)
#   crop_types            plant_growth only
#   animal_types          animal_breeding only
#
# Patterns
#
#   "minecraft:desert"    exact id
#   "minecraft:*"         every id in a namespace
#   "*"                   anything
#   "#minecraft:is_hot"   biome tag (biomes only)
#
# When several rules match, the most specific one wins. Coordinates score
# highest, then temperature, biomes, dimensions and subject patterns. Equal
# scores go to the rule written first.
#
# If rules exist for a subject but none match, the event is blocked when one
# of them has a `dimensions` whitelist or blacklists the current dimension,
# and allowed otherwise.

# Wheat does not grow in hot climates
#
# [[plant_growth.rules]]
# temperature_min = 1.5
# crop_types = ["minecraft:wheat"]
# allow = false

# No farming or breeding around spawn
#
# [[plant_growth.rules]]
# x_min = -500
# x_max = 500
# z_min = -500
# z_max = 500
# allow = false
#
# [[animal_breeding.rules]]
# x_min = -500
# x_max = 500
# z_min = -500
# z_max = 500
# allow = false

# No breeding above Y=150
#
# [[animal_breeding.rules]]
# y_min = 150
# allow = false

# Nether wart only grows in the nether
#
# [[plant_growth.rules]]
# dimensions = ["minecraft:the_nether"]
# crop_types = ["minecraft:nether_wart"]

# Cows never breed in the end
#
# [[animal_breeding.rules]]
# dimensions_blacklist = ["minecraft:the_end"]
# animal_types = ["minecraft:cow"]
"##;
